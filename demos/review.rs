//! Walks one card through a short review session: preview the four
//! choices, commit a rating, persist the successor fields, repeat.
//!
//! Run with `cargo run --example review`.

use chrono::{Duration, Utc};
use srs_engine::{Card, Parameters, Rating, ReviewLog, Scheduler};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scheduler = Scheduler::new(Parameters::default())?;
    let mut now = Utc::now();
    let mut card = Card::new(now);

    let session = [
        Rating::Good,
        Rating::Good,
        Rating::Good,
        Rating::Again,
        Rating::Good,
    ];
    for (step, rating) in session.into_iter().enumerate() {
        let options = scheduler.next_review_options(&card, now);
        println!(
            "step {step} ({:?}, recall {:.3}): again={}d hard={}d good={}d easy={}d",
            card.state,
            scheduler.current_retrievability(&card, now),
            options.again.interval_days,
            options.hard.interval_days,
            options.good.interval_days,
            options.easy.interval_days,
        );

        let result = scheduler.schedule(&card, rating, now);
        card.apply(&result, now);
        let log = ReviewLog::record(1, rating, &result, 2300, now);
        println!("  rated {rating:?}: {}", serde_json::to_string(&log)?);

        // Come back an hour after the card falls due.
        now = result.due + Duration::hours(1);
    }

    println!("final card: {}", serde_json::to_string_pretty(&card)?);
    Ok(())
}

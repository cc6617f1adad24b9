// Session ratings - four fixed questions, each a bounded integer

use anyhow::Result;

use crate::console::Console;
use crate::profile::{Profile, RatingRecord};

const HEADER: &str = "On a scale from 1 to 10 answer the following questions";
const RETRY_MESSAGE: &str = "Response must be a number between 1 and 10.";

const Q_ACCURACY: &str = "How accurate were the responses based on your queries? ";
const Q_DETAIL: &str =
    "What was your satisfaction with the amount of detail provided by the answers? ";
const Q_RECOMMENDED: &str = "How likely are you to recommend this chatbot to a friend? ";
const Q_OVERALL: &str = "How would you rate your overall experience with the chatbot? ";

/// Ask `question` until the answer is an integer in 1..=10.
///
/// Invalid input is never an error: the prompt repeats, with no retry
/// cap. Only console failures propagate.
pub fn prompt_rating(console: &mut dyn Console, question: &str) -> Result<u32> {
    loop {
        let response = console.read_line(question)?;
        if let Ok(value) = response.trim().parse::<u32>() {
            if (1..=10).contains(&value) {
                return Ok(value);
            }
        }
        console.print(RETRY_MESSAGE);
    }
}

/// Ask all four rating questions, append one record keyed by the
/// profile's current visit number, and return the overall score for
/// the closing message.
///
/// The record is attached only after every prompt has succeeded, so a
/// session abort mid-questionnaire leaves the profile untouched.
pub fn collect(console: &mut dyn Console, profile: &mut Profile) -> Result<u32> {
    console.print(HEADER);

    let accuracy = prompt_rating(console, Q_ACCURACY)?;
    let detail = prompt_rating(console, Q_DETAIL)?;
    let recommended = prompt_rating(console, Q_RECOMMENDED)?;
    let overall = prompt_rating(console, Q_OVERALL)?;

    profile.ratings.push(RatingRecord {
        visit: profile.visits,
        accuracy,
        detail,
        recommended,
        overall,
    });

    Ok(overall)
}

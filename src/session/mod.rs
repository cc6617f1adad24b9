// Dialog session - greeting, turn loop, rating phase, persistence
//
// One run is one session: resolve the visitor's profile, answer
// queries until the "finished" sentinel appears, collect ratings, and
// only then write the profile back to disk. Aborting anywhere earlier
// persists nothing.

use anyhow::Result;
use tracing::info;

use crate::console::Console;
use crate::decoder;
use crate::model::{Predictor, Vocab};
use crate::profile::ProfileStore;
use crate::rating;

const GREETING: &str = "Hello, I am a chatbot designed to answer all your questions about Minecraft. Please type in your name: ";
const FIRST_QUERY: &str = "What would you like to know about Minecraft? ";
const NEXT_QUERY: &str = "What else would you like to know about Minecraft? ";
const REMINDER: &str = "Type in \"finished\" if you have no more questions.";
const CLOSING_POSITIVE: &str = "Thank you for chatting with me. I enjoyed our conversation.";
const CLOSING_NEUTRAL: &str =
    "Thank you for chatting with me. I hope your next time is more enjoyable.";

/// Substring that ends the turn loop.
const SENTINEL: &str = "finished";

pub struct Session {
    store: ProfileStore,
}

impl Session {
    pub fn new(store: ProfileStore) -> Self {
        Self { store }
    }

    pub fn run(
        &mut self,
        console: &mut dyn Console,
        predictor: &mut dyn Predictor,
        vocab: &dyn Vocab,
    ) -> Result<()> {
        let name = console.read_line(GREETING)?;

        let mut profile = self.store.load_or_create(&name)?;
        info!("Profile resolved: {} (visit {})", name, profile.visits);

        console.print(&format!(
            "Welcome {}, this is your {} visit. ",
            name,
            num_to_ordinal(&profile.visits.to_string())
        ));

        let mut query = console.read_line(FIRST_QUERY)?.to_lowercase();
        loop {
            if query.contains(SENTINEL) {
                break;
            }
            let response = decoder::respond(&query, predictor, vocab)?;
            console.print(&capitalize(&response));
            console.print(REMINDER);
            query = console.read_line(NEXT_QUERY)?.to_lowercase();
        }

        let overall = rating::collect(console, &mut profile)?;
        console.print(if overall > 5 {
            CLOSING_POSITIVE
        } else {
            CLOSING_NEUTRAL
        });

        self.store.save(&profile)?;
        info!("Profile saved: {} (visit {})", name, profile.visits);
        Ok(())
    }
}

/// Ordinal form of a printed number, by its last digit only. The
/// simplified rule labels 11/12/13 as "11st"/"12nd"/"13rd".
fn num_to_ordinal(num: &str) -> String {
    let suffix = match num.chars().last() {
        Some('1') => "st",
        Some('2') => "nd",
        Some('3') => "rd",
        _ => "th",
    };
    format!("{}{}", num, suffix)
}

/// Uppercase the first character, leave the rest alone.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::scripted::ScriptedConsole;
    use anyhow::Result;
    use ndarray::Array2;
    use tempfile::TempDir;

    #[test]
    fn test_num_to_ordinal() {
        assert_eq!(num_to_ordinal("1"), "1st");
        assert_eq!(num_to_ordinal("2"), "2nd");
        assert_eq!(num_to_ordinal("3"), "3rd");
        assert_eq!(num_to_ordinal("4"), "4th");
        assert_eq!(num_to_ordinal("10"), "10th");
        assert_eq!(num_to_ordinal("21"), "21st");
        // Last-digit rule, preserved as-is.
        assert_eq!(num_to_ordinal("11"), "11st");
        assert_eq!(num_to_ordinal("12"), "12nd");
        assert_eq!(num_to_ordinal("13"), "13rd");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("you need sticks"), "You need sticks");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("7 planks"), "7 planks");
    }

    // Minimal fakes for full-session runs: vocabulary of a few words,
    // predictor that always answers "with sticks".
    struct FakeVocab;

    impl Vocab for FakeVocab {
        fn encode(&self, text: &str) -> Result<Vec<u32>> {
            Ok(text.split_whitespace().map(|_| 3).collect())
        }

        fn word(&self, id: u32) -> Result<String> {
            match id {
                1 => Ok("<sos>".to_string()),
                3 => Ok("with".to_string()),
                4 => Ok("sticks".to_string()),
                _ => anyhow::bail!("unknown id: {}", id),
            }
        }

        fn sos_id(&self) -> u32 {
            1
        }

        fn eos_id(&self) -> u32 {
            2
        }
    }

    struct FakePredictor {
        calls: usize,
    }

    impl Predictor for FakePredictor {
        fn predict(&mut self, _: &[u32], decoder_ids: &[u32]) -> Result<Array2<f32>> {
            self.calls += 1;
            let mut scores = Array2::zeros((decoder_ids.len(), 8));
            // Positions 0 and 1 produce "with sticks", then <eos>.
            scores[[0, 3]] = 1.0;
            scores[[1, 4]] = 1.0;
            for x in 2..decoder_ids.len() {
                scores[[x, 2]] = 1.0;
            }
            Ok(scores)
        }
    }

    fn run_session(inputs: &[&str]) -> (TempDir, ScriptedConsole, ProfileStore) {
        let dir = TempDir::new().expect("tempdir");
        let mut console = ScriptedConsole::new(inputs);
        let mut predictor = FakePredictor { calls: 0 };

        let store = ProfileStore::new(dir.path().join("profiles"));
        let mut session = Session::new(ProfileStore::new(dir.path().join("profiles")));
        session
            .run(&mut console, &mut predictor, &FakeVocab)
            .expect("session should complete");
        (dir, console, store)
    }

    #[test]
    fn test_sentinel_substring_ends_turn_loop() {
        let (_dir, console, _store) = run_session(&[
            "Alex",
            "how do i craft a pickaxe",
            "I am FINISHED now",
            "8",
            "7",
            "9",
            "6",
        ]);

        // One generated turn: capitalized response plus reminder.
        assert!(console.printed.contains(&"With sticks".to_string()));
        assert!(console.printed.contains(&REMINDER.to_string()));
        assert_eq!(*console.printed.last().unwrap(), CLOSING_POSITIVE);
    }

    #[test]
    fn test_immediate_sentinel_skips_generation() {
        let (_dir, console, _store) =
            run_session(&["Alex", "finished", "5", "5", "5", "5"]);

        assert!(!console.printed.contains(&REMINDER.to_string()));
        // Overall 5 is not > 5: neutral closing.
        assert_eq!(*console.printed.last().unwrap(), CLOSING_NEUTRAL);
    }

    #[test]
    fn test_completed_session_persists_profile() {
        let (_dir, _console, store) =
            run_session(&["Alex", "finished", "8", "7", "9", "6"]);

        let profile = store.load_or_create("Alex").unwrap();
        assert_eq!(profile.visits, 2);
        assert_eq!(profile.ratings.len(), 1);
        assert_eq!(profile.ratings[0].visit, 1);
        assert_eq!(profile.ratings[0].overall, 6);
    }

    #[test]
    fn test_welcome_uses_ordinal_visit() {
        let (_dir, console, _store) =
            run_session(&["Alex", "finished", "8", "8", "8", "8"]);

        assert_eq!(
            console.printed[0],
            "Welcome Alex, this is your 1st visit. "
        );
    }

    #[test]
    fn test_aborted_session_persists_nothing() {
        let dir = TempDir::new().expect("tempdir");
        // Script ends mid-questionnaire.
        let mut console = ScriptedConsole::new(&["Alex", "finished", "8"]);
        let mut predictor = FakePredictor { calls: 0 };

        let store = ProfileStore::new(dir.path().join("profiles"));
        let mut session = Session::new(ProfileStore::new(dir.path().join("profiles")));
        assert!(session
            .run(&mut console, &mut predictor, &FakeVocab)
            .is_err());

        let profile = store.load_or_create("Alex").unwrap();
        assert_eq!(profile.visits, 1, "no profile file should exist");
    }

    #[test]
    fn test_generation_happens_once_per_turn() {
        let dir = TempDir::new().expect("tempdir");
        let mut console = ScriptedConsole::new(&[
            "Alex",
            "how do i craft a pickaxe",
            "what about a sword",
            "finished",
            "8",
            "8",
            "8",
            "8",
        ]);
        let mut predictor = FakePredictor { calls: 0 };
        let mut session = Session::new(ProfileStore::new(dir.path().join("profiles")));
        session
            .run(&mut console, &mut predictor, &FakeVocab)
            .unwrap();

        // Two generated turns, three predictor calls each ("with",
        // "sticks", then the call that sees <eos>).
        assert_eq!(predictor.calls, 6);
    }
}

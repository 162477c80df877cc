//! Motivational flavor text.
//!
//! Kept apart from the progression engine: picking a message reads no
//! domain state and mutates nothing, and the random source is injected so
//! progression tests stay deterministic.

use rand::Rng;

/// Messages shown on completions and level-ups.
pub static MESSAGES: &[&str] = &[
    "The system acknowledges your effort.",
    "Another step on the path to awakening.",
    "Strength is built one quest at a time.",
    "Your future self is watching. Make them proud.",
    "Consistency beats intensity.",
    "Even an E-rank hunter can become a legend.",
    "Today's grind is tomorrow's power.",
    "Small wins compound.",
    "The streak is the real boss fight.",
    "Level up in the game, level up in life.",
];

/// Picks a message from the table using the supplied random source.
pub fn pick_message<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    MESSAGES[rng.gen_range(0..MESSAGES.len())]
}

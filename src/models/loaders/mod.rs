pub mod xml_loader;

pub use xml_loader::{load_quiz, parse_quiz_str};

pub mod loaders;
pub mod quiz;

pub use loaders::{load_quiz, parse_quiz_str};
pub use quiz::{CodeBlock, ContentType, Correctness, Fragment, FragmentBody, Question, Quiz, Response};

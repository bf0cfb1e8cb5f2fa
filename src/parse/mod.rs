pub mod gesture_parser;

pub use gesture_parser::{Gesture, ParseError, parse_gestures, parse_target};

mod decode;
mod error;
mod fetch;
mod input;
mod observation;
mod output;
mod render;
mod station;

pub use error::MetarError;
pub use input::*;
pub use output::open_output;
pub use render::*;
pub use station::*;

pub use decode::error::DecodeError;
pub use decode::fields::*;
pub use decode::phenomena::*;
pub use decode::render_raw_text;
pub use decode::report::*;
pub use decode::sky::*;
pub use decode::tokens::{tokenize, Token};
pub use decode::walker::{decode_report, MIN_TOKENS};

pub use observation::*;

pub use fetch::afd::*;
pub use fetch::client::*;
pub use fetch::error::FetchError;

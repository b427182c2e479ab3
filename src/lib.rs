//! # Lyric Sync: Word-Timed TTML Lyrics for Karaoke-Style Highlighting
//!
//! This crate turns a TTML lyrics document, as used by Apple Music and AMLL, into an
//! immutable, time-stamped model and answers "what is being sung right now" queries
//! against it.
//!
//! The pipeline is:
//! - [`parse_ttml`]: builds a [`LyricsDocument`] of [`Line`]s. Each line has a primary
//!   [`Lyrics`] group and a background-vocals group, each holding word-level [`Word`]s,
//!   translations and a romanization.
//! - Spacing reconstruction recovers how many spaces followed each word in the source,
//!   which is otherwise lost when every syllable lives in its own `<span>`.
//! - Sustained-vowel analysis records where long held vowels start, so a renderer can
//!   stretch their animation.
//! - [`active_indices`] / [`active_range`] report the lines active at a playback time,
//!   using inclusive `[begin, end]` intervals.
//!
//! [`LyricsSlot`] lets a host swap in a freshly parsed document while other threads
//! keep reading the previous one.
//!
//! ## ⚠️ Important: Not a General-Purpose Parser
//!
//! This library is **not** designed for generic TTML subtitle files. It understands the
//! `ttm:role` (`x-bg`, `x-translation`, `x-roman`) and `ttm:agent` conventions and the
//! `itunes:*` attributes and `<iTunesMetadata>` block of lyric TTML.
//!
//! ## Examples
//!
//! ```rust
//! use lyric_sync::{ParsingOptions, active_indices, parse_ttml};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ttml = r#"
//!     <tt xmlns="http://www.w3.org/ns/ttml" xmlns:ttm="http://www.w3.org/ns/ttml#metadata">
//!       <body>
//!         <div>
//!           <p begin="0.0s" end="1.2s">
//!             <span begin="0.0s" end="0.5s">Hey</span> <span begin="0.5s" end="1.2s">you</span>
//!           </p>
//!           <p begin="1.2s" end="2.5s">
//!             <span ttm:role="x-bg" begin="1.2s" end="2.5s"><span begin="1.2s" end="2.5s">la</span></span>
//!           </p>
//!         </div>
//!       </body>
//!     </tt>"#;
//!
//!     let document = parse_ttml(ttml, &ParsingOptions::default())?;
//!     let lines = document.lines();
//!
//!     assert_eq!(lines.len(), 2);
//!     assert_eq!(lines[0].lyrics().text(), "Hey you");
//!     assert_eq!(lines[1].background_lyrics().children()[0].text, "la");
//!
//!     assert_eq!(active_indices(lines, 0.6).into_iter().collect::<Vec<_>>(), [0]);
//!     assert_eq!(active_indices(lines, 1.2).into_iter().collect::<Vec<_>>(), [0, 1]);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod markup;
pub mod model;
pub mod parser;
pub mod processors;
pub mod query;
pub mod store;
pub mod timestamp;
mod utils;

pub use config::{ParsingOptions, ParsingOptionsBuilder};
pub use error::LyricsError;
pub use model::{Line, LinePosition, Lyrics, LyricsDocument, LyricsDraft, Translation, Word};
pub use parser::parse_ttml;
pub use processors::vowel::{VowelAnalyzer, VowelSet};
pub use query::{Timed, active_indices, active_range, active_word_indices};
pub use store::LyricsSlot;
pub use timestamp::{TimestampFormat, decode as decode_timestamp, format as format_timestamp};

//! # Adapter Market (Input Layer)
//!
//! Loads the option-chain snapshot the pricing pipeline starts from: spot,
//! trailing dividend yield, time to expiry, and the call and put quotes
//! closest to the money.
//!
//! Two sources implement [`MarketDataSource`]:
//! - [`YahooClient`]: live data from Yahoo Finance's public endpoints
//! - [`JsonFileSource`]: an offline snapshot previously saved as JSON
//!
//! ## Example
//!
//! ```
//! use adapter_market::{select_closest_to_atm, OptionQuote};
//!
//! let quotes = vec![
//!     OptionQuote::new(90.0, 12.1),
//!     OptionQuote::new(100.0, 5.2),
//!     OptionQuote::new(105.0, 3.0),
//! ];
//! let atm = select_closest_to_atm(&quotes, 101.0, 2);
//! assert_eq!(atm[0].strike, 100.0);
//! assert_eq!(atm[1].strike, 105.0);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod snapshot;
pub mod source;
pub mod yahoo;

pub use error::MarketDataError;
pub use snapshot::{
    select_closest_to_atm, select_expiry, time_to_expiry, trailing_dividend_yield,
    OptionChainSnapshot, OptionQuote, EXPIRY_INDEX,
};
pub use source::{JsonFileSource, MarketDataSource};
pub use yahoo::YahooClient;

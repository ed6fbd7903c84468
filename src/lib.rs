//! Wikilookup: on-demand Wikipedia, Wikidata, pageview and search-suggestion lookups
//!
//! Every lookup takes a language-qualified article reference (`"en:Berlin"`),
//! asks one public API, and hands back a small table ready to drop into a
//! spreadsheet. Failures never escape the [`sheet`] layer: a bad reference, a
//! missing page, or a dead network all come back as the same empty answer.
//!
//! # Layers
//!
//! 1. **Transport** -- [`transport::Transport`] is the only place that touches
//!    the network. [`transport::HttpTransport`] is a blocking reqwest client;
//!    tests plug in canned responses instead.
//! 2. **Adapters** -- one module per remote source. Each returns a typed
//!    [`error::LookupResult`] so callers can tell "no data" apart from a
//!    transport fault.
//! 3. **Sheet** -- [`sheet::Sheet`] collapses every result into a
//!    [`models::Answer`], logging whatever was swallowed.
//!
//! # Key Modules
//!
//! - [`reference`] -- `lang:Title` parsing and title encoding
//! - [`mediawiki`] -- MediaWiki `action=query` XML requests
//! - [`links`] -- redirects, backlinks, outbound links, category listings
//! - [`translate`] -- language links and per-language synonym expansion
//! - [`geo`] -- primary coordinates
//! - [`wikidata`] -- claims resolved to human-readable labels
//! - [`pageviews`] -- daily user pageviews
//! - [`edits`] -- revision size deltas
//! - [`suggest`] -- Google Suggest completions
//! - [`output`] -- TSV, CSV and JSON rendering
//! - [`config`] -- endpoints, constants and client settings
//!
//! # Example Usage
//!
//! ```bash
//! wikilookup translate en:Berlin --lang de --lang fr
//! wikilookup facts en:Berlin --mode all --format csv
//! wikilookup pageviews de:Berlin --start 2024-01-01 --end 2024-01-31
//! ```

pub mod config;
pub mod edits;
pub mod error;
pub mod geo;
pub mod links;
pub mod mediawiki;
pub mod models;
pub mod output;
pub mod pageviews;
pub mod query;
pub mod reference;
pub mod sheet;
pub mod suggest;
pub mod translate;
pub mod transport;
pub mod wikidata;

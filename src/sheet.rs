//! Spreadsheet-style entry points.
//!
//! Each method takes the same loose inputs a formula cell would (an
//! `"lang:Title"` string plus optional flags) and returns an [`Answer`]. Every
//! failure, from a malformed reference to a dropped connection, comes back as
//! [`Answer::Empty`]; the typed error is only logged.

use crate::config::ClientConfig;
use crate::edits;
use crate::error::{LookupError, LookupResult};
use crate::geo;
use crate::links;
use crate::models::{Answer, Cell, DateArg, LanguageMap, MultiValueMode, Table};
use crate::pageviews;
use crate::reference::Reference;
use crate::suggest;
use crate::transport::{HttpTransport, Transport};
use crate::translate;
use crate::wikidata;
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub struct Sheet<T> {
    transport: T,
}

impl Sheet<HttpTransport> {
    /// A sheet backed by real HTTP.
    pub fn connect(config: &ClientConfig) -> LookupResult<Self> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: Transport> Sheet<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn synonyms(&self, article: &str) -> Answer {
        self.column("synonyms", article, links::synonyms)
    }

    pub fn inbound_links(&self, article: &str) -> Answer {
        self.column("inbound_links", article, links::inbound_links)
    }

    pub fn outbound_links(&self, article: &str) -> Answer {
        self.column("outbound_links", article, links::outbound_links)
    }

    pub fn mutual_links(&self, article: &str) -> Answer {
        self.column("mutual_links", article, links::mutual_links)
    }

    pub fn category_members(&self, category: &str) -> Answer {
        self.column("category_members", category, links::category_members)
    }

    pub fn subcategories(&self, category: &str) -> Answer {
        self.column("subcategories", category, links::subcategories)
    }

    /// Language links as `[lang, title]` rows, `[title]` rows when
    /// `skip_header` is set, or a `{lang: title}` object when `as_object` is set.
    pub fn translate<S: AsRef<str>>(
        &self,
        article: &str,
        targets: &[S],
        as_object: bool,
        skip_header: bool,
    ) -> Answer {
        settle("translate", article, || {
            let reference = Reference::parse(article)?;
            let map = translate::translations(&self.transport, &reference, targets)?;
            Ok(translations_answer(&map, as_object, skip_header))
        })
    }

    /// Translations plus their synonyms, as `[lang, title, synonym...]` rows
    /// or a `{lang: [title, synonym...]}` object.
    pub fn expand<S: AsRef<str>>(&self, article: &str, targets: &[S], as_object: bool) -> Answer {
        settle("expand", article, || {
            let reference = Reference::parse(article)?;
            let map = translate::expansions(&self.transport, &reference, targets)?;
            Ok(expansions_answer(&map, as_object))
        })
    }

    /// A single `[latitude, longitude]` row.
    pub fn geo_coordinates(&self, article: &str) -> Answer {
        settle("geo_coordinates", article, || {
            let reference = Reference::parse(article)?;
            let point = geo::coordinates(&self.transport, &reference)?;
            Ok(Answer::Table(Table::from_rows(vec![vec![
                Cell::Text(point.latitude),
                Cell::Text(point.longitude),
            ]])))
        })
    }

    /// `[property, value]` rows. `mode` is `"first"`, `"all"`, or anything
    /// else for single-valued claims only.
    pub fn facts(&self, article: &str, mode: Option<&str>) -> Answer {
        settle("facts", article, || {
            let reference = Reference::parse(article)?;
            let mode = MultiValueMode::from_flag(mode);
            let facts = wikidata::facts(&self.transport, &reference, mode)?;
            Ok(Answer::Table(Table::from_rows(
                facts
                    .into_iter()
                    .map(|f| vec![Cell::Text(f.property), Cell::Text(f.value)])
                    .collect(),
            )))
        })
    }

    /// `[timestamp, views]` rows, newest first.
    pub fn pageviews(&self, article: &str, start: Option<&DateArg>, end: Option<&DateArg>) -> Answer {
        settle("pageviews", article, || {
            let reference = Reference::parse(article)?;
            let series = pageviews::pageviews(&self.transport, &reference, start, end)?;
            Ok(Answer::Table(Table::from_rows(
                series
                    .into_iter()
                    .map(|p| vec![Cell::Timestamp(p.timestamp), Cell::Integer(p.views)])
                    .collect(),
            )))
        })
    }

    /// `[timestamp, size delta]` rows, newest first.
    pub fn page_edits(&self, article: &str, start: Option<&DateArg>, end: Option<&DateArg>) -> Answer {
        settle("page_edits", article, || {
            let reference = Reference::parse(article)?;
            let edits = edits::page_edits(&self.transport, &reference, start, end)?;
            Ok(Answer::Table(Table::from_rows(
                edits
                    .into_iter()
                    .map(|e| vec![Cell::Timestamp(e.timestamp), Cell::Integer(e.delta)])
                    .collect(),
            )))
        })
    }

    pub fn suggest(&self, keyword: &str, language: Option<&str>) -> Answer {
        settle("suggest", keyword, || {
            if keyword.is_empty() {
                return Err(LookupError::NoData);
            }
            let suggestions = suggest::suggestions(&self.transport, keyword, language)?;
            Ok(Answer::Table(Table::column(suggestions)))
        })
    }

    fn column<F>(&self, function: &str, input: &str, lookup: F) -> Answer
    where
        F: Fn(&T, &Reference) -> LookupResult<Vec<String>>,
    {
        settle(function, input, || {
            let reference = Reference::parse(input)?;
            Ok(Answer::Table(Table::column(lookup(&self.transport, &reference)?)))
        })
    }
}

/// Collapses any failure into [`Answer::Empty`].
fn settle<F>(function: &str, input: &str, run: F) -> Answer
where
    F: FnOnce() -> LookupResult<Answer>,
{
    match run() {
        Ok(answer) => answer,
        Err(e @ (LookupError::NoData | LookupError::InvalidReference(_))) => {
            debug!(function, input, reason = %e, "empty answer");
            Answer::Empty
        }
        Err(e) => {
            warn!(function, input, error = %e, "lookup failed");
            Answer::Empty
        }
    }
}

fn translations_answer(map: &LanguageMap<String>, as_object: bool, skip_header: bool) -> Answer {
    if as_object {
        let object: Map<String, Value> = map
            .iter()
            .map(|(lang, title)| (lang.to_string(), Value::String(title.clone())))
            .collect();
        return Answer::Object(object);
    }

    let rows = map
        .iter()
        .map(|(lang, title)| {
            if skip_header {
                vec![Cell::from(title.as_str())]
            } else {
                vec![Cell::from(lang), Cell::from(title.as_str())]
            }
        })
        .collect::<Vec<_>>();
    table_or_empty(rows)
}

fn expansions_answer(map: &LanguageMap<Vec<String>>, as_object: bool) -> Answer {
    if as_object {
        let object: Map<String, Value> = map
            .iter()
            .map(|(lang, terms)| {
                let terms = terms.iter().cloned().map(Value::String).collect();
                (lang.to_string(), Value::Array(terms))
            })
            .collect();
        return Answer::Object(object);
    }

    let rows = map
        .iter()
        .map(|(lang, terms)| {
            std::iter::once(Cell::from(lang))
                .chain(terms.iter().map(|t| Cell::from(t.as_str())))
                .collect()
        })
        .collect::<Vec<_>>();
    table_or_empty(rows)
}

fn table_or_empty(rows: Vec<Vec<Cell>>) -> Answer {
    if rows.is_empty() {
        Answer::Empty
    } else {
        Answer::Table(Table::from_rows(rows))
    }
}

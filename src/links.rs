use crate::error::{non_empty, LookupResult};
use crate::mediawiki::{self, TitledEntry};
use crate::reference::Reference;
use crate::transport::Transport;
use std::collections::HashSet;
use tracing::debug;

/// Main (article) namespace
pub const NS_MAIN: u32 = 0;
/// Category namespace
pub const NS_CATEGORY: u32 = 14;

/// Redirects pointing at the article.
pub fn synonyms<T: Transport>(transport: &T, reference: &Reference) -> LookupResult<Vec<String>> {
    let request = mediawiki::query(&reference.language)
        .param("blnamespace", "0")
        .param("list", "backlinks")
        .param("blfilterredir", "redirects")
        .param("bllimit", "max")
        .title("bltitle", &reference.title);
    backlink_titles(transport, reference, &request)
}

/// Articles linking to the article, redirects included.
pub fn inbound_links<T: Transport>(
    transport: &T,
    reference: &Reference,
) -> LookupResult<Vec<String>> {
    let request = mediawiki::query(&reference.language)
        .param("list", "backlinks")
        .param("bllimit", "max")
        .param("blnamespace", "0")
        .title("bltitle", &reference.title);
    backlink_titles(transport, reference, &request)
}

/// Articles the article links to.
pub fn outbound_links<T: Transport>(
    transport: &T,
    reference: &Reference,
) -> LookupResult<Vec<String>> {
    let request = mediawiki::query(&reference.language)
        .param("prop", "links")
        .param("plnamespace", "0")
        .param("pllimit", "max")
        .title("titles", &reference.title);
    let page = mediawiki::fetch(transport, &request)?.first_page()?;
    let titles = titles_of(page.links.map(|l| l.entries).unwrap_or_default());
    debug!(reference = %reference, count = titles.len(), "outbound links");
    non_empty(titles)
}

/// Links that go both ways, in inbound order.
pub fn mutual_links<T: Transport>(
    transport: &T,
    reference: &Reference,
) -> LookupResult<Vec<String>> {
    let inbound = inbound_links(transport, reference)?;
    let outbound = outbound_links(transport, reference)?;
    non_empty(intersect(inbound, &outbound))
}

/// Articles in a category.
pub fn category_members<T: Transport>(
    transport: &T,
    category: &Reference,
) -> LookupResult<Vec<String>> {
    category_listing(transport, category, NS_MAIN)
}

/// Categories nested directly under a category.
pub fn subcategories<T: Transport>(
    transport: &T,
    category: &Reference,
) -> LookupResult<Vec<String>> {
    category_listing(transport, category, NS_CATEGORY)
}

fn category_listing<T: Transport>(
    transport: &T,
    category: &Reference,
    namespace: u32,
) -> LookupResult<Vec<String>> {
    let request = mediawiki::query(&category.language)
        .param("list", "categorymembers")
        .param("cmlimit", "max")
        .param("cmprop", "title")
        .param("cmtype", "subcat|page")
        .param("cmnamespace", &namespace.to_string())
        .title("cmtitle", &category.title);
    let query = mediawiki::fetch(transport, &request)?;
    let titles = titles_of(query.categorymembers.map(|c| c.entries).unwrap_or_default());
    debug!(category = %category, namespace, count = titles.len(), "category members");
    non_empty(titles)
}

fn backlink_titles<T: Transport>(
    transport: &T,
    reference: &Reference,
    request: &crate::query::ApiQuery,
) -> LookupResult<Vec<String>> {
    let query = mediawiki::fetch(transport, request)?;
    let titles = titles_of(query.backlinks.map(|b| b.entries).unwrap_or_default());
    debug!(reference = %reference, count = titles.len(), "backlinks");
    non_empty(titles)
}

fn titles_of(entries: Vec<TitledEntry>) -> Vec<String> {
    entries.into_iter().map(|e| e.title).collect()
}

/// Keeps items of `primary` that also occur in `other`, in `primary` order.
pub fn intersect(primary: Vec<String>, other: &[String]) -> Vec<String> {
    let lookup: HashSet<&str> = other.iter().map(String::as_str).collect();
    primary
        .into_iter()
        .filter(|item| lookup.contains(item.as_str()))
        .collect()
}

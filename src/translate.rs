use crate::error::{LookupError, LookupResult};
use crate::links::synonyms;
use crate::mediawiki;
use crate::models::LanguageMap;
use crate::reference::Reference;
use crate::transport::Transport;
use tracing::debug;

/// Drops blank codes and repeats, keeping first-seen order.
pub fn normalize_languages<S: AsRef<str>>(languages: &[S]) -> Vec<String> {
    let mut seen = Vec::with_capacity(languages.len());
    for language in languages {
        let language = language.as_ref().trim();
        if !language.is_empty() && !seen.iter().any(|s: &String| s == language) {
            seen.push(language.to_string());
        }
    }
    seen
}

/// Titles of the same article in other language editions.
///
/// Requested languages are seeded with the source title so they always appear,
/// then overwritten by real language links. When `targets` is non-empty, links
/// to other languages are ignored. The source language comes last unless a
/// target already claimed its position.
pub fn translations<T: Transport, S: AsRef<str>>(
    transport: &T,
    reference: &Reference,
    targets: &[S],
) -> LookupResult<LanguageMap<String>> {
    let targets = normalize_languages(targets);
    let display_title = reference.display_title();

    let mut results = LanguageMap::new();
    for target in &targets {
        results.insert(target.clone(), display_title.clone());
    }

    let request = mediawiki::query(&reference.language)
        .param("prop", "langlinks")
        .param("lllimit", "max")
        .title("titles", &reference.title);
    let page = mediawiki::fetch(transport, &request)?.first_page()?;
    if page.missing.is_some() {
        debug!(reference = %reference, "page does not exist");
        return Err(LookupError::NoData);
    }

    let links = page.langlinks.map(|l| l.entries).unwrap_or_default();
    debug!(reference = %reference, count = links.len(), "language links");
    for link in links {
        if !targets.is_empty() && !targets.contains(&link.lang) {
            continue;
        }
        results.insert(link.lang, link.title);
    }

    results.insert(reference.language.clone(), display_title);
    Ok(results)
}

/// Each translation followed by the redirects pointing at it in its own wiki.
///
/// A failed synonym lookup only leaves that language without synonyms.
pub fn expansions<T: Transport, S: AsRef<str>>(
    transport: &T,
    reference: &Reference,
    targets: &[S],
) -> LookupResult<LanguageMap<Vec<String>>> {
    let translated = translations(transport, reference, targets)?;

    let mut results = LanguageMap::new();
    for (language, title) in translated.iter() {
        let mut terms = vec![title.clone()];
        match synonyms(transport, &Reference::new(language, title.as_str())) {
            Ok(found) => terms.extend(found),
            Err(e) => debug!(language, title = %title, error = %e, "no synonyms"),
        }
        results.insert(language, terms);
    }
    Ok(results)
}

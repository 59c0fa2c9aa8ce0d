//! HTML extraction for news article pages.

use scraper::{Html, Selector};
use crate::FetchError;

pub const NO_HEADLINE: &str = "No headline found";
pub const NO_CONTENT: &str = "No article content found";

/// Headline and body text pulled out of an article page
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArticle {
    pub headline: String,
    pub content: String,
}

fn selector(css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::Selector(format!("{css}: {e:?}")))
}

/// Extract the first `<h1>` as the headline and the `<p>` paragraphs inside
/// `<article>` as the body.
pub fn parse_article_html(html: &str) -> Result<ParsedArticle, FetchError> {
    let document = Html::parse_document(html);

    let h1 = selector("h1")?;
    let article = selector("article")?;
    let paragraph = selector("p")?;

    let headline = document
        .select(&h1)
        .next()
        .map(|node| node.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| NO_HEADLINE.to_string());

    let content = match document.select(&article).next() {
        Some(body) => body
            .select(&paragraph)
            .map(|p| p.text().collect::<String>())
            .collect::<Vec<_>>()
            .join(" "),
        None => NO_CONTENT.to_string(),
    };

    Ok(ParsedArticle { headline, content })
}

//! Message texts. Article cards use the HTML subset chat transports accept:
//! bold headline, labeled link, optional trailing image URL.

use crate::types::Article;

/// Label of the one actionable control offered with the greeting.
pub const NEWS_ACTION: &str = "Latest news";

pub fn article_card(article: &Article) -> String {
    let headline = format!("<b>{}</b>", escape(&article.title));
    let link = format!("<a href=\"{}\">Read the story</a>", article.link);
    match &article.image {
        Some(image) => format!("{}\n{}\n{}", headline, link, image),
        None => format!("{}\n{}", headline, link),
    }
}

pub fn greeting() -> String {
    "Welcome to the news relay! Press the button below to get the latest world news."
        .to_string()
}

pub fn waiting() -> String {
    "One moment, checking for fresh news...".to_string()
}

pub fn no_news() -> String {
    "No news available right now. Please try again later.".to_string()
}

pub fn try_later() -> String {
    "Could not load the news right now. Please try again later.".to_string()
}

pub fn all_caught_up() -> String {
    "You are all caught up, no new articles since last time.".to_string()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(image: Option<&str>) -> Article {
        Article {
            title: "Summit ends with trade deal".to_string(),
            link: "https://news.example.com/summit".to_string(),
            image: image.map(|s| s.to_string()),
        }
    }

    #[test]
    fn card_with_image_has_three_lines() {
        let card = article_card(&article(Some("https://cdn.example.com/pic.jpg")));
        assert_eq!(
            card,
            "<b>Summit ends with trade deal</b>\n\
             <a href=\"https://news.example.com/summit\">Read the story</a>\n\
             https://cdn.example.com/pic.jpg"
        );
    }

    #[test]
    fn card_without_image_has_two_lines() {
        let card = article_card(&article(None));
        assert_eq!(card.lines().count(), 2);
        assert!(!card.ends_with('\n'));
    }

    #[test]
    fn headline_markup_is_escaped() {
        let card = article_card(&Article {
            title: "Q&A: <live> coverage".to_string(),
            link: "https://news.example.com/qa".to_string(),
            image: None,
        });
        assert!(card.contains("<b>Q&amp;A: &lt;live&gt; coverage</b>"));
    }
}

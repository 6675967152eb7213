use html_escape::decode_html_entities;
use scraper::{Html, Selector};

/// Decode HTML entities in a plain-text field such as a title
pub fn decode(text: &str) -> String {
    // upstream sometimes double-encodes (&amp;amp;)
    decode_html_entities(&decode_html_entities(text.trim())).into_owned()
}

/// Strip markup from an HTML fragment and collapse whitespace
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lower-case, trim, hyphens to spaces
pub fn clean_name(name: &str) -> String {
    collapse_whitespace(&name.trim().to_lowercase().replace('-', " "))
}

/// Tag form of a free-text label: "Lacto Ovo-Vegetarian" -> "lacto_ovo_vegetarian"
pub fn slug(label: &str) -> String {
    clean_name(label).replace(' ', "_")
}

/// Split free-form instruction text into steps.
///
/// List items are used when the text is an HTML list; otherwise the text is
/// split on line breaks, and a single paragraph is split into sentences.
pub fn split_steps(instructions: &str) -> Vec<String> {
    if instructions.trim().is_empty() {
        return Vec::new();
    }

    let fragment = Html::parse_fragment(instructions);
    if let Ok(selector) = Selector::parse("li") {
        let items: Vec<String> = fragment
            .select(&selector)
            .map(|li| collapse_whitespace(&li.text().collect::<String>()))
            .filter(|step| !step.is_empty())
            .collect();
        if !items.is_empty() {
            return items;
        }
    }

    let with_breaks = instructions
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("</p>", "\n");
    let lines: Vec<String> = with_breaks
        .lines()
        .map(strip_html)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.len() > 1 {
        return lines;
    }

    let paragraph = lines.into_iter().next().unwrap_or_default();
    paragraph
        .split_inclusive(". ")
        .map(|sentence| sentence.trim().to_string())
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

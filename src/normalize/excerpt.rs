/// Anchor text of the purchase link
pub const BUY_TICKETS_LABEL: &str = "BUY TICKETS";

const SPACER: &str = "<br><br>";

/// Composes the excerpt fragment from a description and a purchase link
///
/// | text | link | result |
/// |------|------|--------|
/// | some | some | `<p>text</p>` + spacer + link list |
/// | none | some | spacer + link list |
/// | some | none | same as both present, with an empty `href` |
/// | none | none | empty string |
///
/// Blank text counts as absent. Text is inserted verbatim; it comes from the
/// page's own rendered description.
pub fn compose_excerpt(text: Option<&str>, link: Option<&str>) -> String {
    let text = text.map(str::trim).filter(|t| !t.is_empty());

    match (text, link) {
        (None, None) => String::new(),
        (None, Some(link)) => format!("{}{}", SPACER, ticket_list(link)),
        (Some(text), link) => format!(
            "<p>{}</p>{}{}",
            text,
            SPACER,
            ticket_list(link.unwrap_or_default())
        ),
    }
}

fn ticket_list(link: &str) -> String {
    format!(
        "<ul><li><a href='{}'>{}</a></li></ul>",
        link, BUY_TICKETS_LABEL
    )
}

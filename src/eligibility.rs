use crate::config::Config;

/// Tags that remain eligible under `only_interactive`.
pub const INTERACTIVE_ELEMENTS: [&str; 13] = [
    "a", "button", "input", "select", "textarea", "form", "fieldset", "details", "summary",
    "dialog", "menu", "menuitem", "label",
];

/// Formatting, void, media and meta tags. They may still be tagged, but they
/// never show up as a path segment, neither as the element itself nor as a
/// parent.
pub const PATH_EXCLUDED_ELEMENTS: [&str; 26] = [
    // text formatting
    "b", "i", "em", "strong", "small", "mark", "del", "ins", "sub", "sup",
    // breaks
    "br", "hr", "wbr",
    // media
    "img", "svg", "picture", "source", "audio", "video", "track",
    // meta
    "meta", "link", "style", "script", "noscript", "template",
];

pub fn is_interactive(tag: &str) -> bool {
    INTERACTIVE_ELEMENTS.contains(&tag)
}

pub fn is_path_excluded(tag: &str) -> bool {
    PATH_EXCLUDED_ELEMENTS.contains(&tag)
}

/// Component references (`<Button>`) rather than host elements.
pub fn is_component_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

pub fn is_eligible<'a, I>(tag: &str, existing_attribute_names: I, config: &Config) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    if config.respect_existing
        && existing_attribute_names
            .into_iter()
            .any(|name| name == config.attribute_name)
    {
        return false;
    }
    if config.skip_elements.contains(tag) {
        return false;
    }
    if config.only_interactive && !is_interactive(tag) {
        return false;
    }
    true
}

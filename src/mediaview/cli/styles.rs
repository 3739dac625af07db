use console::Style;
use once_cell::sync::Lazy;

pub static HEADER: Lazy<Style> = Lazy::new(|| Style::new().bold().underlined());
pub static ID: Lazy<Style> = Lazy::new(|| Style::new().yellow());
pub static DIM: Lazy<Style> = Lazy::new(|| Style::new().color256(246).italic());
pub static LABEL: Lazy<Style> = Lazy::new(|| Style::new().bold());

pub static INFO: Lazy<Style> = Lazy::new(|| Style::new().dim());
pub static SUCCESS: Lazy<Style> = Lazy::new(|| Style::new().green());
pub static WARNING: Lazy<Style> = Lazy::new(|| Style::new().yellow());
pub static ERROR: Lazy<Style> = Lazy::new(|| Style::new().red());

/// Apply `style` to `text`, or return it untouched when colors are off.
pub fn paint(style: &Style, text: &str, color: bool) -> String {
    style
        .clone()
        .force_styling(color)
        .apply_to(text)
        .to_string()
}

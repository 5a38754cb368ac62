use yansi::Paint;

/// Color palette for consistent theming
pub struct ColorPalette {
    pub primary: (u8, u8, u8),   // IDs, muted text
    pub secondary: (u8, u8, u8), // Headers, emphasis
    pub url: (u8, u8, u8),       // URLs
    pub alert: (u8, u8, u8),     // Warnings, embedded-icon marker
}

impl ColorPalette {
    pub const CATPPUCCIN: Self = Self {
        primary: (108, 112, 134), // Gray
        secondary: (148, 226, 213), // Teal
        url: (137, 180, 250),     // Blue
        alert: (243, 139, 168),   // Pink
    };
}

/// Formatting context passed through rendering
pub struct FormatContext {
    pub use_color: bool,
    pub palette: ColorPalette,
}

impl FormatContext {
    pub fn new(use_color: bool) -> Self {
        Self { use_color, palette: ColorPalette::CATPPUCCIN }
    }

    pub fn from_env() -> Self {
        let use_color = std::env::var("NO_COLOR").is_err();
        Self::new(use_color)
    }

    pub fn format_id(&self, id: u32) -> String {
        let text = id.to_string();
        if self.use_color {
            let (r, g, b) = self.palette.primary;
            Paint::rgb(text.as_str(), r, g, b).to_string()
        } else {
            text
        }
    }

    pub fn format_header(&self, text: &str) -> String {
        if self.use_color {
            let (r, g, b) = self.palette.secondary;
            Paint::rgb(text, r, g, b).bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn format_url(&self, url: &str) -> String {
        if self.use_color {
            let (r, g, b) = self.palette.url;
            Paint::rgb(url, r, g, b).to_string()
        } else {
            url.to_string()
        }
    }

    /// Site names get a stable per-name color, like tiles on the grid.
    pub fn format_name(&self, name: &str) -> String {
        if self.use_color {
            let (r, g, b) = color_for_name(name);
            Paint::rgb(name, r, g, b).bold().to_string()
        } else {
            name.to_string()
        }
    }

    pub fn format_alert(&self, text: &str) -> String {
        if self.use_color {
            let (r, g, b) = self.palette.alert;
            Paint::rgb(text, r, g, b).to_string()
        } else {
            text.to_string()
        }
    }
}

fn color_for_name(name: &str) -> (u8, u8, u8) {
    const PALETTE: &[(u8, u8, u8)] = &[
        (137, 180, 250),
        (166, 227, 161),
        (249, 226, 175),
        (245, 194, 231),
        (255, 169, 167),
        (148, 226, 213),
        (198, 160, 246),
        (255, 214, 165),
        (179, 255, 171),
        (186, 225, 255),
        (255, 241, 173),
        (214, 182, 255),
    ];
    PALETTE[(hash_name(name) as usize) % PALETTE.len()]
}

fn hash_name(name: &str) -> u64 {
    let mut h: u64 = 5381;
    for b in name.bytes() {
        h = (h.wrapping_shl(5)).wrapping_add(h) ^ u64::from(b);
    }
    h
}

/// Truncate text to a width, appending an ellipsis when needed.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    let len = text.chars().count();
    if len <= max_width {
        return text.to_string();
    }
    if max_width == 1 {
        return "…".to_string();
    }
    let mut out =
        text.chars().take(max_width.saturating_sub(1)).collect::<String>();
    out.push('…');
    out
}

/// Right-pad a field based on visible length (ignoring ANSI codes).
pub fn pad_field(display: &str, target: usize) -> String {
    let mut out = display.to_string();
    let padding = target.saturating_sub(display_len(display));
    out.push_str(&" ".repeat(padding));
    out
}

/// Compute visible length of a string, ignoring ANSI escape sequences.
pub fn display_len(s: &str) -> usize {
    let mut len = 0;
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
            continue;
        }
        len += 1;
    }
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_context_passes_text_through() {
        let ctx = FormatContext::new(false);
        assert_eq!(ctx.format_id(7), "7");
        assert_eq!(ctx.format_name("Github"), "Github");
        assert_eq!(ctx.format_url("https://a.example"), "https://a.example");
    }

    #[test]
    fn display_len_ignores_ansi_codes() {
        let colored = FormatContext::new(true).format_name("Github");
        assert_eq!(display_len(&colored), 6);
        assert_eq!(display_len("plain"), 5);
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("much too long", 8), "much to…");
        assert_eq!(truncate_with_ellipsis("x", 0), "");
    }

    #[test]
    fn pad_field_uses_visible_width() {
        let ctx = FormatContext::new(true);
        let padded = pad_field(&ctx.format_id(3), 4);
        assert_eq!(display_len(&padded), 4);
    }
}

//! Terminal rendering of the tile grid and the flat list.

use crate::formatting::{
    FormatContext, display_len, pad_field, truncate_with_ellipsis,
};
use crate::pager::Pager;
use crate::website::Website;
use terminal_size::{Width, terminal_size};

/// Visible width of one grid cell.
const TILE_WIDTH: usize = 20;

/// The original grid never goes wider than six tiles.
const MAX_COLUMNS: usize = 6;

fn terminal_width() -> usize {
    terminal_size().map(|(Width(w), _)| w as usize).unwrap_or(80)
}

fn grid_columns(width: usize) -> usize {
    (width / TILE_WIDTH).clamp(1, MAX_COLUMNS)
}

/// Render the current page of the grid, tiles in reading order, with a
/// page footer.
pub fn render_page(
    websites: &[Website],
    pager: &Pager,
    ctx: &FormatContext,
) -> String {
    render_page_width(websites, pager, ctx, terminal_width())
}

fn render_page_width(
    websites: &[Website],
    pager: &Pager,
    ctx: &FormatContext,
    width: usize,
) -> String {
    if websites.is_empty() {
        return "No websites yet. Try `quick_tabs add <url>`.".to_string();
    }
    let columns = grid_columns(width);
    let visible = pager.page_slice(websites);
    let mut out = String::new();
    for row in visible.chunks(columns) {
        let mut cells = Vec::with_capacity(row.len());
        for site in row {
            cells.push(pad_field(&tile(site, ctx), TILE_WIDTH));
        }
        out.push_str(cells.join(" ").trim_end());
        out.push('\n');
    }
    let total = pager.total_pages(websites.len()).max(1);
    out.push_str(&ctx.format_header(&format!(
        "page {}/{total}  (s next, w prev)",
        pager.current_page() + 1
    )));
    out
}

// One cell: id, name, and a marker for embedded icons. The marker's two
// columns are reserved out of the name budget so the cell never exceeds
// TILE_WIDTH.
fn tile(site: &Website, ctx: &FormatContext) -> String {
    let id = ctx.format_id(site.id);
    let embedded = site.icon.starts_with("data:");
    let reserved = display_len(&id) + 3 + if embedded { 2 } else { 0 };
    let name_width = TILE_WIDTH.saturating_sub(reserved).max(4);
    let name = ctx.format_name(&truncate_with_ellipsis(&site.name, name_width));
    if embedded {
        format!("[{id}] {name} {}", ctx.format_alert("●"))
    } else {
        format!("[{id}] {name}")
    }
}

/// Flat listing: one record per line with id, name and url.
pub fn render_list(websites: &[Website], ctx: &FormatContext) -> String {
    if websites.is_empty() {
        return "No websites yet. Try `quick_tabs add <url>`.".to_string();
    }
    let id_width = websites
        .iter()
        .map(|w| w.id.to_string().len())
        .max()
        .unwrap_or(1);
    let name_width = websites
        .iter()
        .map(|w| w.name.chars().count().min(24))
        .max()
        .unwrap_or(4);
    let mut lines = Vec::with_capacity(websites.len());
    for site in websites {
        let name = truncate_with_ellipsis(&site.name, 24);
        lines.push(format!(
            "{} {} {}",
            pad_field(&ctx.format_id(site.id), id_width),
            pad_field(&ctx.format_name(&name), name_width),
            ctx.format_url(&site.url)
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pager::Pager;

    fn site(id: u32, name: &str, icon: &str) -> Website {
        Website {
            id,
            name: name.to_string(),
            url: format!("https://{id}.example"),
            icon: icon.to_string(),
        }
    }

    #[test]
    fn grid_wraps_rows_at_column_count() {
        let sites: Vec<Website> = (1..=8)
            .map(|i| site(i, &format!("Site{i}"), "https://i.example/x.png"))
            .collect();
        let ctx = FormatContext::new(false);
        let out = render_page_width(&sites, &Pager::default(), &ctx, 80);
        // 80 columns fit four 20-wide tiles per row.
        let rows: Vec<&str> = out.lines().collect();
        assert!(rows[0].contains("[1] Site1"));
        assert!(rows[0].contains("[4] Site4"));
        assert!(rows[1].starts_with("[5] Site5"));
        assert!(rows.last().unwrap().contains("page 1/1"));
    }

    #[test]
    fn embedded_icons_get_a_marker() {
        let sites = vec![site(1, "Pinned", "data:image/png;base64,AAAA")];
        let ctx = FormatContext::new(false);
        let out = render_page_width(&sites, &Pager::default(), &ctx, 80);
        assert!(out.contains("[1] Pinned ●"));
    }

    #[test]
    fn marker_tiles_stay_within_the_cell_width() {
        let sites = vec![
            site(1, "AnExtremelyLongSiteName", "data:image/png;base64,AAAA"),
            site(2, "Next", "https://i.example/x.png"),
        ];
        let ctx = FormatContext::new(false);
        let out = render_page_width(&sites, &Pager::default(), &ctx, 80);
        let row = out.lines().next().unwrap();
        // The marker must not push the neighbouring cell out of column.
        let idx = row.find("[2]").unwrap();
        assert_eq!(display_len(&row[..idx]), TILE_WIDTH + 1);
        assert!(row.contains("●"));
    }

    #[test]
    fn second_page_shows_remaining_tiles() {
        let sites: Vec<Website> = (1..=40)
            .map(|i| site(i, &format!("S{i}"), "u"))
            .collect();
        let mut pager = Pager::default();
        pager.next(sites.len());
        let ctx = FormatContext::new(false);
        let out = render_page_width(&sites, &pager, &ctx, 80);
        assert!(out.contains("[37] S37"));
        assert!(!out.contains("[36] S36"));
        assert!(out.contains("page 2/2"));
    }

    #[test]
    fn empty_collection_prompts_for_add() {
        let ctx = FormatContext::new(false);
        let out = render_list(&[], &ctx);
        assert!(out.contains("No websites yet"));
    }
}

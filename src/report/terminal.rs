use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use indexmap::IndexSet;
use regex::Regex;

use crate::donations::DonationTable;
use crate::pipeline::Summary;

const DEFAULT_WIDTH: u16 = 80;
/// Room left for the author and donate-link columns.
const RESERVED_WIDTH: u16 = 50;
const MIN_LIST_WIDTH: usize = 20;
/// Visible width of the " + XX more" suffix.
const ELLIPSIS_LEN: usize = " + XX more".len();

/// Render the ranked donation summary.
pub fn render(summary: &Summary, table: &DonationTable, quiet: bool) {
    let donations = &summary.donations;
    let authors = donations.seeking_authors.len();
    let teams = donations.seeking_packages.len();

    if quiet {
        println!("Authors: {}  Teams: {}", authors, teams);
        return;
    }

    println!("{}", headline(authors, teams));
    if donations.is_empty() {
        return;
    }

    println!("{}\n", render_table(summary, table));
}

fn headline(authors: usize, teams: usize) -> String {
    let author_str = format!("{} authors", authors).cyan();
    let team_str = format!("{} teams", teams).cyan();
    let seeking = "seeking donations!".magenta();

    match (authors > 0, teams > 0) {
        (true, true) => format!(
            "{} You depend on {} and {} who are {} ✨\n",
            "✔".green(),
            author_str,
            team_str,
            seeking
        ),
        (true, false) => format!(
            "{} You depend on {} who are {} ✨\n",
            "✔".green(),
            author_str,
            seeking
        ),
        (false, true) => format!(
            "{} You depend on {} who are {} ✨\n",
            "✔".green(),
            team_str,
            seeking
        ),
        (false, false) => format!(
            "{} You depend on {} who are seeking donations! 😌",
            "✔".green(),
            "no authors".cyan()
        ),
    }
}

fn render_table(summary: &Summary, donation_table: &DonationTable) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Author").add_attribute(Attribute::Bold),
            Cell::new("Where to Donate").add_attribute(Attribute::Bold),
            Cell::new("Dependencies").add_attribute(Attribute::Bold),
        ]);

    let width = table.width().unwrap_or(DEFAULT_WIDTH);
    let max_len = usize::from(width.saturating_sub(RESERVED_WIDTH)).max(MIN_LIST_WIDTH);

    for author in &summary.donations.seeking_authors {
        let url = donation_table.author_url(author).unwrap_or_default();
        let pkgs = summary
            .author_pkg_names
            .get(author)
            .map(Vec::as_slice)
            .unwrap_or_default();

        table.add_row(vec![
            Cell::new(author),
            Cell::new(pretty_url(url).cyan()),
            Cell::new(package_list(pkgs, &summary.direct, max_len)),
        ]);
    }

    for name in &summary.donations.seeking_packages {
        let url = donation_table.package_url(name).unwrap_or_default();
        table.add_row(vec![
            Cell::new(format!("{} (team)", name)),
            Cell::new(pretty_url(url).cyan()),
            Cell::new(highlight(name, &summary.direct)),
        ]);
    }

    table
}

/// Comma-separated package list, direct dependencies highlighted, cut short
/// with "+ N more" when it would not fit in `max_len` columns.
fn package_list(names: &[String], direct: &IndexSet<String>, max_len: usize) -> String {
    let shown = fitting_count(names, max_len);
    let mut out = names[..shown]
        .iter()
        .map(|name| highlight(name, direct))
        .collect::<Vec<_>>()
        .join(", ");

    if shown < names.len() {
        out.push_str(&format!(" {}", format!("+ {} more", names.len() - shown).magenta()));
    }
    out
}

/// How many leading names fit in `max_len` columns, leaving room for the
/// "+ N more" suffix.
fn fitting_count(names: &[String], max_len: usize) -> usize {
    let budget = max_len.saturating_sub(ELLIPSIS_LEN);
    let mut used = 0;
    for (i, name) in names.iter().enumerate() {
        let item_len = if i == 0 { name.len() } else { name.len() + 2 };
        if used + item_len >= budget {
            return i;
        }
        used += item_len;
    }
    names.len()
}

fn highlight(name: &str, direct: &IndexSet<String>) -> String {
    if direct.contains(name) {
        name.green().bold().to_string()
    } else {
        name.to_string()
    }
}

/// Drop the scheme, a leading `www.` and a trailing slash.
pub fn pretty_url(url: &str) -> String {
    let Ok(prefix) = Regex::new(r"^https?://(www\.)?") else {
        return url.to_string();
    };
    prefix
        .replace(url, "")
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pretty_url() {
        assert_eq!(pretty_url("https://www.patreon.com/feross"), "patreon.com/feross");
        assert_eq!(pretty_url("https://en.liberapay.com/andrew/"), "en.liberapay.com/andrew");
        assert_eq!(pretty_url("http://hughsk.io/donate/"), "hughsk.io/donate");
    }

    #[test]
    fn test_everything_fits() {
        assert_eq!(fitting_count(&names(&["a", "b", "c"]), 80), 3);
    }

    #[test]
    fn test_list_is_cut_before_overflow() {
        // budget = 30 - 10 = 20; "aaaaaaaa" (8) + ", bbbbbbbb" (10) = 18, next would be 28
        let list = names(&["aaaaaaaa", "bbbbbbbb", "cccccccc", "dddddddd"]);
        assert_eq!(fitting_count(&list, 30), 2);
    }

    #[test]
    fn test_long_first_name_shows_only_suffix() {
        let list = names(&["a-very-long-package-name-indeed"]);
        assert_eq!(fitting_count(&list, 20), 0);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(fitting_count(&[], 40), 0);
        assert_eq!(package_list(&[], &IndexSet::new(), 40), "");
    }
}

//! Attendance stats handler.

use wedly_core::{GuestBook, GuestStats};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

/// Whole-number share of `part` in `whole`; zero for an empty list.
fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let pct = u64::from(part) * 100 / u64::from(whole);
    u32::try_from(pct).unwrap_or(100)
}

fn detail(s: &GuestStats) -> String {
    [
        format!("Guests:       {}", s.total),
        format!(
            "Checked in:   {} ({}%)",
            s.checked_in,
            percent(s.checked_in, s.total)
        ),
        format!("Pending:      {}", s.pending()),
        format!("VIP:          {}", s.vip_total),
        format!(
            "VIP arrived:  {} ({}%)",
            s.vip_checked_in,
            percent(s.vip_checked_in, s.vip_total)
        ),
    ]
    .join("\n")
}

pub async fn handle(book: &GuestBook, global: &GlobalOpts) -> Result<(), CliError> {
    let stats = util::with_spinner("Counting guests", global.quiet, book.fetch_stats()).await?;
    let out = output::render_single(&global.output, &stats, detail, |s| {
        format!("{}/{}", s.checked_in, s.total)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_down_and_handles_empty_lists() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(7, 7), 100);
    }

    #[test]
    fn detail_lists_pending_guests() {
        let stats = GuestStats {
            total: 7,
            checked_in: 3,
            vip_total: 3,
            vip_checked_in: 2,
        };
        let text = detail(&stats);
        assert!(text.contains("Pending:      4"));
        assert!(text.contains("VIP arrived:  2 (66%)"));
    }
}

//! Boxed error report for build-time config validation
//!
//! Shared by build.rs and the firmware's tests.

/// Widest line that fits inside the box
const WIDTH: usize = 62;

/// Shorten `line` to the box width, on character boundaries
pub fn clip(line: &str) -> String {
    if line.chars().count() > WIDTH {
        format!("{}...", line.chars().take(WIDTH - 3).collect::<String>())
    } else {
        line.to_string()
    }
}

/// Render the report body
pub fn render(title: &str, lines: &[String]) -> String {
    let body = lines
        .iter()
        .map(|l| format!("║  • {:<62} ║", clip(l)))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    )
}

/// Abort the build with a boxed error report
#[allow(dead_code)]
pub fn fail(title: &str, lines: &[String]) -> ! {
    panic!("{}", render(title, lines));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_multibyte() {
        let line = format!("{}é suffix that overflows the box width", "x".repeat(58));
        let clipped = clip(&line);
        assert_eq!(clipped.chars().count(), 62);
        assert!(clipped.starts_with(&"x".repeat(58)));
        assert!(clipped.ends_with("é..."));
    }

    #[test]
    fn test_short_line_kept() {
        assert_eq!(clip("period_s must be an integer"), "period_s must be an integer");
    }

    #[test]
    fn test_render_lists_every_line() {
        let report = render("Invalid board configuration", &["a".into(), "b".into()]);
        assert!(report.contains("ERROR: Invalid board configuration"));
        assert!(report.contains("║  • a "));
        assert!(report.contains("║  • b "));
    }
}

use foldmon::record::analyzer::{CodeAnalyzer, HeuristicAnalyzer};
use foldmon::record::kind::{FileKind, extension_of};
use foldmon::record::metrics::analyze_text;
use foldmon::session::Command;
use proptest::prelude::*;
use std::io::Cursor;
use std::path::Path;

proptest! {
    #[test]
    fn test_text_metrics_match_line_split(content in "[a-z \n\r]{0,400}") {
        let metrics = analyze_text(&mut Cursor::new(content.as_bytes())).unwrap();

        // A trailing newline does not open another line
        let body = content.strip_suffix('\n').unwrap_or(&content);
        let lines: Vec<&str> = if content.is_empty() {
            Vec::new()
        } else {
            body.split('\n').collect()
        };

        prop_assert_eq!(metrics.lines, lines.len());
        prop_assert_eq!(
            metrics.characters,
            content.len() - content.matches('\n').count()
        );
        prop_assert_eq!(
            metrics.words,
            content.matches(' ').count() + lines.len()
        );
    }

    #[test]
    fn test_words_never_below_lines(content in ".{0,200}") {
        let metrics = analyze_text(&mut Cursor::new(content.as_bytes())).unwrap();
        prop_assert!(metrics.words >= metrics.lines);
    }

    #[test]
    fn test_program_counts_bounded_by_lines(source in "[a-z(){}; \n]{0,400}") {
        let metrics = HeuristicAnalyzer
            .analyze(&mut Cursor::new(source.as_bytes()))
            .unwrap();
        let text = analyze_text(&mut Cursor::new(source.as_bytes())).unwrap();

        prop_assert_eq!(metrics.lines, text.lines);
        prop_assert!(metrics.classes <= metrics.lines);
        prop_assert!(metrics.methods <= metrics.lines);
    }

    #[test]
    fn test_classification_depends_only_on_extension(stem in "[a-zA-Z0-9_]{1,16}") {
        let cases = [
            ("txt", FileKind::Text),
            ("png", FileKind::Image),
            ("jpg", FileKind::Image),
            ("cpp", FileKind::Program),
            ("java", FileKind::Program),
            ("bmp", FileKind::Generic),
        ];
        for (ext, kind) in cases {
            let name = format!("{stem}.{ext}");
            let path = Path::new(&name);
            prop_assert_eq!(FileKind::from_path(path), kind);
            prop_assert_eq!(extension_of(path), format!(".{ext}"));
        }
    }

    #[test]
    fn test_info_argument_survives_quoting(name in "[a-zA-Z0-9_. ]{1,24}") {
        prop_assume!(!name.trim().is_empty());
        let line = format!("info '{name}'");
        prop_assert_eq!(Command::parse(&line), Command::Info(Some(name)));
    }
}

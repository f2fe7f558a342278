//! Batch file parsing and destination resolution.

use crate::cli::batch_file::{parse_batch, BatchEntry};
use crate::cli::commands::{collect_pairs, FetchArgs};
use modelfetch_core::config::FetchConfig;
use std::path::{Path, PathBuf};

#[test]
fn skips_comments_and_blank_lines() {
    let text = "\n# models\nhttps://a.example/x.bin\n   \nhttps://b.example/y.bin lora\n  # trailing\n";
    assert_eq!(
        parse_batch(text),
        vec![
            BatchEntry {
                url: "https://a.example/x.bin".into(),
                dir: None
            },
            BatchEntry {
                url: "https://b.example/y.bin".into(),
                dir: Some("lora".into())
            },
        ]
    );
}

#[test]
fn pairs_resolve_presets_and_per_line_dirs() {
    let tmp = tempfile::tempdir().unwrap();
    let list = tmp.path().join("list.txt");
    std::fs::write(&list, "https://a.example/x.bin\nhttps://b.example/y.bin lora\nhttps://c.example/z.bin sub\n").unwrap();

    let cfg = FetchConfig::default();
    let args = FetchArgs {
        urls: vec!["https://d.example/w.bin".into(), "  ".into()],
        batch: Some(list),
        dir: "vae".into(),
        jobs: None,
    };
    let pairs = collect_pairs(&cfg, &args, Path::new("/work")).unwrap();
    assert_eq!(
        pairs,
        vec![
            ("https://d.example/w.bin".to_string(), PathBuf::from("/root/ComfyUI/models/vae")),
            ("https://a.example/x.bin".to_string(), PathBuf::from("/root/ComfyUI/models/vae")),
            ("https://b.example/y.bin".to_string(), PathBuf::from("/root/ComfyUI/models/loras")),
            ("https://c.example/z.bin".to_string(), PathBuf::from("/work/sub")),
        ]
    );
}

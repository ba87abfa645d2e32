use crate::domain::DiffPayload;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DiffLineKind {
    Hunk,
    Add,
    Del,
    Context,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub old_line: Option<u32>,
    pub new_line: Option<u32>,
    pub text: String,
}

/// Presentation of a loaded diff payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DiffView {
    Text(Vec<DiffLine>),
    Binary {
        old_asset_ref: Option<String>,
        new_asset_ref: Option<String>,
    },
}

impl DiffView {
    pub fn from_payload(payload: DiffPayload) -> Self {
        let has_assets = payload.old_asset_ref.is_some() || payload.new_asset_ref.is_some();
        match payload.raw_text {
            Some(raw) if !is_binary(&raw) => DiffView::Text(parse_unified(&raw)),
            None if !has_assets => DiffView::Text(Vec::new()),
            _ => DiffView::Binary {
                old_asset_ref: payload.old_asset_ref,
                new_asset_ref: payload.new_asset_ref,
            },
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary { .. })
    }
}

/// Only `diff --git`, `index ` and `new file mode` lines are dropped. Every other line is
/// classified by its first byte, so `--- a/x`/`+++ b/x` file headers show up as Del/Add rows
/// and `\ No newline at end of file` as context.
pub fn parse_unified(raw: &str) -> Vec<DiffLine> {
    let mut out = Vec::new();
    let mut old_line: u32 = 0;
    let mut new_line: u32 = 0;

    for line in raw.lines() {
        if line.starts_with("diff --git")
            || line.starts_with("index ")
            || line.starts_with("new file mode")
        {
            continue;
        }

        if line.starts_with("@@") {
            if let Some((old_start, new_start)) = parse_hunk_header(line) {
                old_line = old_start;
                new_line = new_start;
            }
            out.push(DiffLine {
                kind: DiffLineKind::Hunk,
                old_line: None,
                new_line: None,
                text: line.to_string(),
            });
            continue;
        }

        let (kind, old, new) = if line.starts_with('+') {
            let n = new_line;
            new_line = new_line.saturating_add(1);
            (DiffLineKind::Add, None, Some(n))
        } else if line.starts_with('-') {
            let o = old_line;
            old_line = old_line.saturating_add(1);
            (DiffLineKind::Del, Some(o), None)
        } else {
            let (o, n) = (old_line, new_line);
            old_line = old_line.saturating_add(1);
            new_line = new_line.saturating_add(1);
            (DiffLineKind::Context, Some(o), Some(n))
        };

        out.push(DiffLine {
            kind,
            old_line: old,
            new_line: new,
            text: line.to_string(),
        });
    }

    out
}

/// A binary marker only counts when no added line is present; some backends print the marker
/// next to a textual preamble.
pub fn is_binary(raw: &str) -> bool {
    let has_marker = raw
        .lines()
        .any(|l| l.starts_with("Binary files ") || l.starts_with("GIT binary patch"));
    has_marker && !raw.contains("\n+")
}

/// Parses `@@ -<old>[,<n>] +<new>[,<n>] @@` and returns the two start lines.
pub fn parse_hunk_header(text: &str) -> Option<(u32, u32)> {
    let rest = text.strip_prefix("@@ ")?;
    let (ranges, _) = rest.split_once(" @@")?;
    let (old, new) = ranges.split_once(' ')?;
    let old_start = parse_range_start(old.strip_prefix('-')?)?;
    let new_start = parse_range_start(new.strip_prefix('+')?)?;
    Some((old_start, new_start))
}

fn parse_range_start(s: &str) -> Option<u32> {
    let (start, count) = match s.split_once(',') {
        Some((start, count)) => (start, Some(count)),
        None => (s, None),
    };
    if let Some(count) = count {
        count.parse::<u32>().ok()?;
    }
    start.parse::<u32>().ok()
}

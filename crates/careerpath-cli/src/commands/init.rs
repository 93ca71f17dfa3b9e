//! The `careerpath init` command.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

pub fn execute(out: &mut impl Write) -> Result<()> {
    write_if_missing(Path::new("careerpath.toml"), SAMPLE_CONFIG, out)?;

    std::fs::create_dir_all("drafts")?;
    write_if_missing(Path::new("drafts/question.toml"), SAMPLE_QUESTION, out)?;
    write_if_missing(
        Path::new("drafts/recommendation.toml"),
        SAMPLE_RECOMMENDATION,
        out,
    )?;

    writeln!(out, "\nNext steps:")?;
    writeln!(out, "  1. Edit careerpath.toml with your backend URL and account")?;
    writeln!(out, "  2. Students: careerpath student overview")?;
    writeln!(out, "  3. Admins:   careerpath admin requests --status pending")?;

    Ok(())
}

fn write_if_missing(path: &Path, content: &str, out: &mut impl Write) -> Result<()> {
    if path.exists() {
        writeln!(out, "{} already exists, skipping.", path.display())?;
    } else {
        std::fs::write(path, content)?;
        writeln!(out, "Created {}", path.display())?;
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# careerpath configuration

base_url = "http://localhost:8000/api/"
token = "${CAREERPATH_TOKEN}"
timeout_secs = 30
export_dir = "."

[user]
email = "student@example.com"
role = "student"
"#;

const SAMPLE_QUESTION: &str = r#"# careerpath admin add-question --test <id> --file drafts/question.toml
prompt = "Which activity energises you the most?"

[[options]]
label = "Sketching interfaces"
description = "Turning rough ideas into screens"

[[options]]
label = "Analysing data"
description = "Finding the pattern in a spreadsheet"

[[options]]
label = "Explaining ideas to people"
"#;

const SAMPLE_RECOMMENDATION: &str = r#"# careerpath admin recommend --test <id> --file drafts/recommendation.toml
career_name = "UX Designer"
summary = """
A design-led problem solver who enjoys understanding people.
"""

[[steps]]
title = "Explore UX foundations"
description = "Work through an introductory course on user research"

[[steps]]
title = "Shadow a mentor"

[[steps]]
title = "Start a design journal"
"#;

//! The `quizgrade init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quizgrade.toml
    if std::path::Path::new("quizgrade.toml").exists() {
        println!("quizgrade.toml already exists, skipping.");
    } else {
        std::fs::write("quizgrade.toml", SAMPLE_CONFIG)?;
        println!("Created quizgrade.toml");
    }

    // Create sample lesson library
    std::fs::create_dir_all("lessons")?;
    let sample_path = std::path::Path::new("lessons/sample.json");
    if sample_path.exists() {
        println!("lessons/sample.json already exists, skipping.");
    } else {
        std::fs::write(sample_path, SAMPLE_LIBRARY)?;
        println!("Created lessons/sample.json");
    }

    println!("\nNext steps:");
    println!("  1. Edit lessons/sample.json or point quizgrade.toml at your library");
    println!("  2. Run: quizgrade validate");
    println!("  3. Run: quizgrade grade --lesson lesson_01 --answers answers.json --student <id>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizgrade configuration

library = "lessons/sample.json"
ledger = "quizgrade-attempts.json"
# output_dir = "quizgrade-results"
"#;

const SAMPLE_LIBRARY: &str = r#"{
  "appName": "English Quest",
  "version": 2,
  "lessons": [
    {
      "id": "lesson_01",
      "title": "Everyday English",
      "description": "Warm-up quiz covering vocabulary and simple sentences.",
      "kind": "quiz",
      "takePolicy": { "mode": "limit", "limit": 3 },
      "questions": [
        {
          "id": "q_01",
          "type": "single",
          "prompt": "Which word is a verb?",
          "options": ["run", "table", "happy"],
          "answer": "run"
        },
        {
          "id": "q_02",
          "type": "multi",
          "prompt": "Select all the fruits.",
          "options": ["apple", "carrot", "banana", "potato"],
          "answer": ["apple", "banana"]
        },
        {
          "id": "q_03",
          "type": "exact",
          "prompt": "Type: I am learning English.",
          "answer": "I am learning English."
        },
        {
          "id": "q_04",
          "type": "contains",
          "prompt": "Explain why you study English. Use the word 'because'.",
          "keywords": ["because"],
          "minWords": 5
        }
      ]
    },
    {
      "id": "lesson_02",
      "title": "Final Exam",
      "kind": "exam",
      "takePolicy": { "mode": "one_time", "limit": 0 },
      "questions": [
        {
          "id": "q_01",
          "type": "single",
          "prompt": "Choose the past tense of 'go'.",
          "options": ["goed", "went", "gone"],
          "answer": "went"
        }
      ]
    }
  ]
}
"#;

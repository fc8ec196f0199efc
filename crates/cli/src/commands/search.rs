//! `aocook search` — Query the knowledge base without the assistant.

use aocook_knowledge::KnowledgeBase;

pub fn run(query: &str, category: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let kb = KnowledgeBase::load(&config.knowledge.path)?;

    let results = kb.search(query, category);
    if results.is_empty() {
        eprintln!("No matches for \"{query}\".");
    }
    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}

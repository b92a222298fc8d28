/// The fixed instruction sent with every meal analysis.
///
/// Loaded from `prompt.txt` at compile time. The extractor depends on the
/// model echoing the `| Food Item` header this prompt asks for, so the
/// English column name stays even though the reply is requested in Spanish.
pub const INSTRUCTION_PROMPT: &str = include_str!("prompt.txt");

use policyloc::{
    Assembler, Error, LanguageList, PolicyConfig, PolicyDocument, extract,
    extract_content_definitions, generate, traits::Parser,
};
use tracing::info;

/// Options for `policyloc generate`.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub i18n: String,
    pub output: String,
    pub config: Option<String>,
    pub allow_divergent_resources: bool,
}

/// Read `{i18n}/{lang}.json` for every language and write the policy.
pub fn run_generate_command(
    languages: &LanguageList,
    options: &GenerateOptions,
) -> Result<(), Error> {
    let config = match &options.config {
        Some(path) => {
            info!(path = %path, "loading policy config");
            PolicyConfig::read_from(path)?
        }
        None => PolicyConfig::default(),
    };
    let assembler =
        Assembler::new(config).allow_divergent_resources(options.allow_divergent_resources);

    let document = generate(&options.i18n, languages, &options.output, &assembler)?;
    println!(
        "✅ Wrote {} ({} content definitions, {} localized resources)",
        options.output,
        document.content_definitions.len(),
        document.localized_resources.len()
    );
    Ok(())
}

/// Read the policy and write `{i18n}/{lang}.json` for every language.
pub fn run_extract_command(
    languages: &LanguageList,
    input: &str,
    i18n: &str,
) -> Result<(), Error> {
    let table = extract(input, languages, i18n)?;
    for language in languages.iter() {
        let resources = table.resource_ids_for(language).len();
        if resources == 0 {
            eprintln!("⚠️  No localized resources found for language: {}", language);
        }
        println!(
            "✅ {}/{}.json ({} resources)",
            i18n.trim_end_matches('/'),
            language,
            resources
        );
    }
    Ok(())
}

/// Content definitions referencing `language`, as pretty JSON.
pub fn run_inspect_command(input: &str, language: &str) -> Result<String, Error> {
    let document = PolicyDocument::read_from(input)?;
    let definitions = extract_content_definitions(&document, language);
    Ok(serde_json::to_string_pretty(&definitions)?)
}

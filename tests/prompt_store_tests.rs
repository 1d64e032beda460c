use pretty_assertions::assert_eq;
use sommelier_rust::{Error, prompts::PromptStore};
use tempfile::TempDir;
use tokio::fs;

const TEMPLATE: &str =
    "{% if wine_list %}The wine list:\n{{ wine_list }}\n\n{% endif %}The guest asks: {{ user_prompt }}";

fn test_store() -> PromptStore {
    PromptStore::from_parts("You are a sommelier.", "Transcribe the wine list.", TEMPLATE).unwrap()
}

#[tokio::test]
async fn load_reads_all_three_prompt_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("sommelier_system_prompt.txt"), "system text")
        .await
        .unwrap();
    fs::write(dir.path().join("image_processing_prompt.txt"), "ocr text")
        .await
        .unwrap();
    fs::write(dir.path().join("sommelier_user_prompt_template.txt"), TEMPLATE)
        .await
        .unwrap();

    let store = PromptStore::load(dir.path()).await.unwrap();

    assert_eq!(store.sommelier_system_prompt(), "system text");
    assert_eq!(store.image_processing_prompt(), "ocr text");
    assert_eq!(
        store.render_user_prompt("Duck?", None).unwrap(),
        "The guest asks: Duck?"
    );
}

#[tokio::test]
async fn load_fails_when_a_prompt_file_is_missing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("sommelier_system_prompt.txt"), "system text")
        .await
        .unwrap();

    let err = PromptStore::load(dir.path()).await.unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("image_processing_prompt.txt"));
}

#[test]
fn render_includes_the_wine_list_when_present() {
    let rendered = test_store()
        .render_user_prompt("What pairs with duck?", Some("1. Syrah"))
        .unwrap();

    assert_eq!(
        rendered,
        "The wine list:\n1. Syrah\n\nThe guest asks: What pairs with duck?"
    );
}

#[test]
fn render_omits_the_menu_section_when_absent() {
    let rendered = test_store()
        .render_user_prompt("What pairs with duck?", None)
        .unwrap();

    assert_eq!(rendered, "The guest asks: What pairs with duck?");
    assert!(!rendered.contains("wine list"));
}

#[test]
fn render_includes_the_caller_prompt_exactly_once() {
    let rendered = test_store()
        .render_user_prompt("What pairs with duck?", Some("Duck-friendly reds"))
        .unwrap();

    assert_eq!(rendered.matches("What pairs with duck?").count(), 1);
}

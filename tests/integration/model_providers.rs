//! Integration tests for model provider construction

use reelgate::config::{ProviderConfig, ProviderType};
use reelgate::provider::{ChatMessage, MessageRole, ModelProvider, ProviderFactory};

#[test]
fn test_openai_client() {
    let provider = ModelProvider::OpenAI {
        model: "gpt-4o-mini".to_string(),
        api_key: "test-key".to_string(),
        base_url: None,
    };
    let client = ProviderFactory::create_client(&provider).unwrap();
    assert_eq!(client.provider_name(), "openai");
    assert_eq!(client.model_name(), "gpt-4o-mini");
}

#[test]
fn test_ollama_client() {
    let provider = ModelProvider::Ollama {
        model: "llama3".to_string(),
        base_url: Some("http://localhost:11434".to_string()),
    };
    let client = ProviderFactory::create_client(&provider).unwrap();
    assert_eq!(client.provider_name(), "ollama");
    assert_eq!(client.model_name(), "llama3");
}

#[test]
fn test_local_client_from_profile() {
    let config = ProviderConfig {
        provider_type: ProviderType::LocalCustom,
        model: "qwen".to_string(),
        endpoint: Some("http://localhost:8080/v1".to_string()),
        ..ProviderConfig::default()
    };
    assert!(config.validate().is_ok());
    let client = ProviderFactory::create_client(&config.to_model_provider().unwrap()).unwrap();
    assert_eq!(client.provider_name(), "local");
    assert_eq!(client.model_name(), "qwen");
}

#[test]
fn test_chat_message_constructors() {
    let system = ChatMessage::system("rules");
    let user = ChatMessage::user("hint");
    assert_eq!(system.role, MessageRole::System);
    assert_eq!(user.role, MessageRole::User);
    assert_eq!(user.content, "hint");
}

//! Tokenize, detokenize, validate and delete against a PaymentsWs endpoint.
//!
//! ```sh
//! PAYMENTSWS_API_KEY=your_api_key cargo run -p paymentsws --example token_service
//! ```
//!
//! For a local mock vault (`cargo run -p paymentsws-mock`) also set
//! `PAYMENTSWS_API_HOST=127.0.0.1:3000` and `PAYMENTSWS_API_HTTPS=false`.

use paymentsws::{CardData, ClientConfig, PaymentsWsClient, RequestOptions};

fn main() -> Result<(), paymentsws::ConfigError> {
    let mut config = ClientConfig::from_env()?;
    // Sandbox hosts may present certificates that do not verify.
    config.set_extra_options(RequestOptions::new().with("verify", false));
    let client = PaymentsWsClient::from_config(config);
    let tokens = client.tokens();

    let result = tokens.tokenize("hello");
    println!("Tokenization result (string): {result:#?}");

    let result = tokens.tokenize(CardData {
        pan: "4100123412341234".to_string(),
        expiration_date: "12/22".to_string(),
        card_holder: "John Doe".to_string(),
    });
    println!("Tokenization result (card): {result:#?}");

    let Some(token) = result.token() else {
        println!("no token returned, stopping");
        return Ok(());
    };

    println!("Detokenization result: {:#?}", tokens.detokenize(token.as_str()));
    println!("Validation result: {:#?}", tokens.validate(token.as_str()));
    println!("Delete token result: {:#?}", tokens.delete(token.as_str()));
    Ok(())
}

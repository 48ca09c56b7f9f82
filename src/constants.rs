//! Defaults shared by the configuration layer, the adapters and the CLI.

// Upstream model service
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b:exacto";
pub const DEFAULT_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_MAX_TOKENS: u32 = 512;
pub const DEFAULT_HTTP_REFERER: &str = "https://teamraft.com";
pub const DEFAULT_APP_TITLE: &str = "Raft AI Engineer Coding Challenge";

// Raw order source
pub const DEFAULT_ORDER_API_BASE_URL: &str = "http://localhost:5001/api";
pub const DEFAULT_FETCH_LIMIT: usize = 50;

// Primary normalizer resilience
pub const DEFAULT_PRIMARY_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PRIMARY_MAX_RETRIES: u32 = 2;
pub const DEFAULT_PRIMARY_BACKOFF_MS: u64 = 500;

// Service
pub const DEFAULT_SERVER_PORT: u16 = 8000;
pub const DEFAULT_DEMO_API_PORT: u16 = 5001;
pub const DEFAULT_CONFIG_FILE: &str = "order-agent.toml";

// Logging
pub const LOG_DIR: &str = "logs";
pub const LOG_FILE_PREFIX: &str = "order-agent.log";

/// Placeholder substituted with the newline-joined raw orders.
pub const RAW_ORDERS_PLACEHOLDER: &str = "<<<RAW_ORDERS>>>";

/// Prompt sent to the primary normalizer. Asks for a bare JSON array.
pub const NORMALIZATION_PROMPT: &str = r#"
You are a data normalization system.

You will be given messy, unstructured order text.
Each line represents exactly one order.

Your task:
- Parse each line into a JSON object
- Follow the schema exactly
- Do NOT add extra fields
- Do NOT explain your reasoning
- Output ONLY valid JSON (no markdown, no prose)

Schema:
[
  {
    "orderId": "string",
    "buyer": "string",
    "state": "string",
    "total": number
  }
]

Input text:
<<<RAW_ORDERS>>>
"#;

/// Canonical sample lines served by the demo order API.
pub const SAMPLE_RAW_ORDERS: [&str; 5] = [
    "Order 1001: Buyer=John Davis, Location=Columbus, OH, Total=$742.10, Items: laptop, hdmi cable",
    "Order 1002: Buyer=Sarah Liu, Location=Austin, TX, Total=$156.55, Items: headphones",
    "Order 1003: Buyer=Mike Turner, Location=Cleveland, OH, Total=$1299.99, Items: gaming pc, mouse",
    "Order 1004: Buyer=Rachel Kim, Location=Seattle, WA, Total=$89.50, Items: coffee maker",
    "Order 1005: Buyer=Chris Myers, Location=Cincinnati, OH, Total=$512.00, Items: monitor, desk lamp",
];

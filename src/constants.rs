// Provider endpoints, status codes and console formatting shared across the crate

// Provider API
pub const QRCODE_GENERATE_URL: &str =
    "https://passport.bilibili.com/x/passport-login/web/qrcode/generate";
pub const QRCODE_POLL_URL: &str = "https://passport.bilibili.com/x/passport-login/web/qrcode/poll";

/// URLs the cookie jar is queried against when extracting credentials
///
/// Domain cookies on `.bilibili.com` match the first; host-only cookies set by
/// the login host only match the second. Earlier scopes win on name clashes.
pub const COOKIE_SCOPE_URLS: [&str; 2] = [
    "https://www.bilibili.com/",
    "https://passport.bilibili.com/",
];

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_REFERER: &str = "https://www.bilibili.com/";

/// HTTP request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

// Poll status codes reported in `data.code`
pub const POLL_CODE_SUCCESS: i64 = 0;
pub const POLL_CODE_EXPIRED: i64 = 86038;
pub const POLL_CODE_SCANNED: i64 = 86090;
pub const POLL_CODE_NOT_SCANNED: i64 = 86101;

// Poll loop timing
pub const POLL_INTERVAL_SECS: u64 = 2;
pub const POLL_CEILING_SECS: u64 = 180;

// Credential cookie names
pub const COOKIE_SESSDATA: &str = "SESSDATA";
pub const COOKIE_BILI_JCT: &str = "bili_jct";
pub const COOKIE_DEDE_USER_ID: &str = "DedeUserID";

// Files written next to the executable
pub const QR_IMAGE_FILE: &str = "login_qrcode.png";
pub const CONFIG_FILE: &str = "config.json";

// QR rendering
pub const QR_BOX_SIZE: u32 = 10;
pub const QR_BORDER_MODULES: u32 = 5;

pub const FORMAT_RESET: &str = "\x1b[0m";
pub const FORMAT_BOLD: &str = "\x1b[1m";
pub const FORMAT_RED: &str = "\x1b[31m";
pub const FORMAT_GREEN: &str = "\x1b[32m";
pub const FORMAT_YELLOW: &str = "\x1b[33m";
pub const FORMAT_CYAN: &str = "\x1b[36m";

use crate::recognition::HostEnvironment;

/// Shown when the host offers no speech recognition at all
pub const UNSUPPORTED_MESSAGE: &str = "您的浏览器不支持语音识别，请使用 Chrome 或 Edge";

/// Network failure while the capability is reached securely
pub const NETWORK_MESSAGE: &str =
    "无法连接语音服务（网络错误）。请检查网络、防火墙或 VPN 是否允许访问 Google 语音服务，或稍后重试。";

/// Network failure on an insecure origin, where the capability usually refuses to run
pub const INSECURE_TRANSPORT_MESSAGE: &str =
    "语音识别需要 HTTPS 环境，请使用 https://localhost:5173 访问。";

/// Category of a recognizer failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// No recognition entry point in the host
    UnsupportedCapability,
    /// `aborted` / `no-speech`: expected, never shown
    BenignSignal,
    /// `network`, split by whether the transport was secure
    TransientNetwork { secure: bool },
    /// Anything else, carrying the raw code
    GenericRecognitionError(String),
}

impl ErrorKind {
    /// User-facing message, or `None` for suppressed signals
    pub fn message(&self) -> Option<String> {
        match self {
            Self::UnsupportedCapability => Some(UNSUPPORTED_MESSAGE.to_string()),
            Self::BenignSignal => None,
            Self::TransientNetwork { secure: true } => Some(NETWORK_MESSAGE.to_string()),
            Self::TransientNetwork { secure: false } => {
                Some(INSECURE_TRANSPORT_MESSAGE.to_string())
            }
            Self::GenericRecognitionError(code) => Some(format!("识别错误: {}", code)),
        }
    }
}

/// Maps raw recognizer error codes to user-facing categories
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn classify(code: &str, environment: &HostEnvironment) -> ErrorKind {
        match code {
            "aborted" | "no-speech" => ErrorKind::BenignSignal,
            "network" => ErrorKind::TransientNetwork {
                secure: environment.secure_transport,
            },
            other => ErrorKind::GenericRecognitionError(other.to_string()),
        }
    }
}

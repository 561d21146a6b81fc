pub mod adjust;
pub mod analyze;
pub mod compare;
pub mod info;
pub mod pantone;
pub mod process;

pub use adjust::{handle_adjust_colors, AdjustRequest, AdjustResponse, __path_handle_adjust_colors};
pub use analyze::{handle_analyze, AnalyzeRequest, __path_handle_analyze};
pub use compare::{handle_compare, CompareRequest, CompareResponse, __path_handle_compare};
pub use info::{handle_health, handle_root, HealthResponse, MethodInfo, ServiceInfo};
pub use info::{__path_handle_health, __path_handle_root};
pub use pantone::{handle_match_pantone, MatchRequest, MatchResponse, __path_handle_match_pantone};
pub use process::{handle_process, ChannelResponse, ProcessRequest, SeparationResponse, __path_handle_process};

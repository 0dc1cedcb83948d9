// ==========================================
// 供应商SKU混合匹配引擎 - 引擎层
// ==========================================
// 职责: 实现匹配业务规则, 不拼 SQL
// 红线: Engine 不拼 SQL; 评分/决策为纯函数, 结果可复现
// ==========================================

pub mod error;
pub mod events;
pub mod learning;
pub mod matcher;
pub mod merger;
pub mod ports;
pub mod ranking;
pub mod scoring;

// 重导出核心引擎
pub use error::{MatcherError, MatcherResult};
pub use events::{
    FeedbackAction, MappingFeedbackEvent, MappingFeedbackPublisher, NoOpFeedbackPublisher,
    OptionalFeedbackPublisher,
};
pub use learning::{ConfirmRequest, LearningLoop};
pub use matcher::{HybridMatcher, MatchProviders};
pub use merger::CandidateMerger;
pub use ports::{
    EmbeddingProvider, LexicalField, LexicalSearchProvider, NoEmbedding, NoReferencePrices,
    ProductReadModel, ReferencePriceProvider, SemanticSearchProvider, DEFAULT_MIN_SIMILARITY,
    DEFAULT_RETRIEVAL_LIMIT,
};
pub use ranking::MatchRanker;
pub use scoring::MatchScorer;

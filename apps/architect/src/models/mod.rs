pub mod analysis;
pub mod document;

pub use analysis::{AnalysisResult, DocumentField, ImprovementAnswers};
pub use document::{
    ContactInfo, CoverLetterDocument, Education, Experience, ResumeDocument, SkillSet,
    StructuredCoverLetter, StructuredResume,
};

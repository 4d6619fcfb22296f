pub mod destination;
pub mod group;
pub mod image;

pub use destination::{Destination, Recommendation, RecommendationResponse};
pub use group::{
    CreateGroupRequest, Group, Member, MemberQuery, MemberUpdate, NameRequest, NewQuestionnaire,
    Questionnaire, QuestionnaireRequest, RoundOutcome, RoundStatus, Vote, VoteRequest, VotingRound,
};
pub use image::{CategoryImage, CategoryImages, PexelsPhoto, PexelsPhotoSource, PexelsSearchResponse};

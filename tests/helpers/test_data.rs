//! Generated test data

use chrono::{Duration, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use uuid::Uuid;

use GatherUp::models::{CreateEventRequest, CreateGroupRequest, CreateUserRequest, ProfileFields};

/// Password accepted by registration in every test
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// A unique, valid email address
pub fn unique_email() -> String {
    let email: String = SafeEmail().fake();
    format!("{}.{}", &Uuid::new_v4().simple().to_string()[..8], email)
}

pub fn profile() -> ProfileFields {
    ProfileFields {
        first_name: Some(FirstName().fake()),
        last_name: Some(LastName().fake()),
        bio: None,
        location: None,
    }
}

pub fn registration() -> CreateUserRequest {
    CreateUserRequest {
        email: unique_email(),
        password: TEST_PASSWORD.to_string(),
        profile: profile(),
    }
}

pub fn event_request(max_participants: i32) -> CreateEventRequest {
    CreateEventRequest {
        title: "Sunday run".to_string(),
        description: Some(Sentence(3..8).fake()),
        date: Utc::now() + Duration::days(7),
        location: "Riverside park".to_string(),
        event_type: "sport".to_string(),
        requirements: None,
        max_participants,
    }
}

pub fn group_request(is_private: bool, max_participants: i32) -> CreateGroupRequest {
    CreateGroupRequest {
        name: "Book club".to_string(),
        description: Some(Sentence(3..8).fake()),
        is_private,
        max_participants,
    }
}

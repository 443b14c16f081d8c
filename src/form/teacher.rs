use super::schema::{FieldDescriptor, FieldKind, FormSchema, SchemaError};

pub const FULL_NAME_FIELD: &str = "fullName";
pub const EMAIL_FIELD: &str = "email";
pub const PHONE_FIELD: &str = "phoneNumber";
pub const CITY_FIELD: &str = "cityState";
pub const QUALIFICATION_FIELD: &str = "highestQualification";
pub const VIDEO_FIELD: &str = "video";
pub const SUBJECTS_FIELD: &str = "subjects";
pub const TIME_SLOTS_FIELD: &str = "preferredTimeSlots";

pub const SUBJECTS: &[&str] = &[
    "Abacus",
    "AI & ML",
    "Astronomy",
    "Chess",
    "Coding for Kids",
    "Creative Thinking",
    "Digital Skills",
    "Drawing",
    "Emotional Intelligence",
    "Entrepreneurship",
    "Financial Literacy",
    "Leadership Skills",
    "Self-Defence",
    "Mindfulness",
    "Singing (Western)",
    "Music Instrument",
    "Carnatic (Singing)",
    "Hindustani (Singing)",
    "Indian Knowledge (Slokas, Ramayan, Gita)",
    "Olympiad Preparation",
    "Public Speaking",
    "Spoken English",
    "Vedic Maths",
    "Creative Writing",
    "Yoga",
];

pub const TIME_SLOTS: &[&str] = &[
    "Morning (6–10 AM)",
    "Afternoon (12–4 PM)",
    "Evening (5–9 PM)",
    "Late Night (9 PM onwards)",
    "Flexible",
];

const YES_NO: [&str; 2] = ["yes", "no"];

const BASIC: &str = "Basic Information";
const EXPERIENCE: &str = "Education & Experience";
const STYLE: &str = "Teaching Style & Personality";
const AVAILABILITY: &str = "Availability & Preferences";
const DEMO: &str = "Demo Video";

/// The canonical teacher application form.
pub fn teacher_application() -> Result<FormSchema, SchemaError> {
    use FieldKind::*;

    FormSchema::new(vec![
        FieldDescriptor::new(FULL_NAME_FIELD, "Full Name", BASIC, ShortText).required(),
        FieldDescriptor::new(PHONE_FIELD, "Phone Number (WhatsApp preferred)", BASIC, ShortText)
            .required(),
        FieldDescriptor::new(EMAIL_FIELD, "Email Address", BASIC, ShortText).required(),
        FieldDescriptor::new("age", "Age", BASIC, ShortText).required(),
        FieldDescriptor::new("gender", "Gender", BASIC, SingleChoice)
            .with_options(["male", "female", "other"]),
        FieldDescriptor::new(CITY_FIELD, "City & State", BASIC, ShortText).required(),
        FieldDescriptor::new(
            "preferredLanguage",
            "Preferred Language of Instruction",
            BASIC,
            ShortText,
        )
        .required(),
        FieldDescriptor::new(QUALIFICATION_FIELD, "Highest Qualification", BASIC, ShortText)
            .required(),
        FieldDescriptor::new("collegeUniversity", "College/University Attended", BASIC, ShortText)
            .required(),
        FieldDescriptor::new("yearOfPostGraduation", "Year of Post-Graduation", BASIC, ShortText)
            .required(),
        FieldDescriptor::new(
            SUBJECTS_FIELD,
            "Which topics are you confident teaching?",
            EXPERIENCE,
            MultiChoice,
        )
        .with_options(SUBJECTS.iter().copied())
        .required(),
        FieldDescriptor::new(
            "teachingExperience",
            "Do you have any teaching experience? If yes, where and for how long?",
            EXPERIENCE,
            LongText,
        )
        .required(),
        FieldDescriptor::new(
            "currentEmployment",
            "If currently employed, where? Why are you exploring teaching?",
            EXPERIENCE,
            LongText,
        ),
        FieldDescriptor::new(
            "onlineTeachingExperience",
            "Have you taught online before?",
            EXPERIENCE,
            SingleChoice,
        )
        .with_options(YES_NO)
        .required(),
        FieldDescriptor::new(
            "toolsPlatforms",
            "Tools/platforms you've used (Zoom, Jitsi, Google Meet, etc.)",
            EXPERIENCE,
            LongText,
        )
        .required(),
        FieldDescriptor::new(
            "excitementAboutTeaching",
            "What excites you about teaching kids aged 8–18?",
            STYLE,
            LongText,
        )
        .required(),
        FieldDescriptor::new(
            "biggestStrength",
            "What's your biggest strength as a teacher or communicator?",
            STYLE,
            LongText,
        )
        .required(),
        FieldDescriptor::new(
            "creativeExample",
            "Share an example of a creative or fun way you taught a concept.",
            STYLE,
            LongText,
        )
        .required(),
        FieldDescriptor::new(
            "managingDistractedChild",
            "How would you manage a distracted or bored child in a class?",
            STYLE,
            LongText,
        )
        .required(),
        FieldDescriptor::new(
            "expertTopic",
            "What's one topic you can teach better than most people? Why?",
            STYLE,
            LongText,
        )
        .required(),
        FieldDescriptor::new(
            "expectedHourlyRate",
            "Your expected hourly rate (₹)",
            AVAILABILITY,
            ShortText,
        )
        .required(),
        FieldDescriptor::new(
            "partTimeWillingness",
            "Are you open to part-time teaching (5–20 hours/week)?",
            AVAILABILITY,
            SingleChoice,
        )
        .with_options(YES_NO)
        .required(),
        FieldDescriptor::new(
            "earlyMorningWillingness",
            "Are you willing to teach early mornings (US/Canada time zones)?",
            AVAILABILITY,
            SingleChoice,
        )
        .with_options(YES_NO)
        .required(),
        FieldDescriptor::new(
            "classesPerWeek",
            "How many classes per week can you take consistently?",
            AVAILABILITY,
            ShortText,
        )
        .required(),
        FieldDescriptor::new(TIME_SLOTS_FIELD, "Preferred time slots (IST)", AVAILABILITY, MultiChoice)
            .with_options(TIME_SLOTS.iter().copied())
            .required(),
        FieldDescriptor::new(
            "otherCommitments",
            "Do you have any other commitments that could affect your availability?",
            AVAILABILITY,
            LongText,
        ),
        FieldDescriptor::new(VIDEO_FIELD, "Demo video recording", DEMO, Media).required(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{validate, FormState};

    fn complete_form() -> FormState {
        let schema = teacher_application().unwrap();
        let mut state = FormState::new();
        for field in schema.fields() {
            match field.kind {
                FieldKind::MultiChoice => state.set_list(&field.id, [field.options[0].clone()]),
                FieldKind::SingleChoice => state.set_text(&field.id, field.options[0].clone()),
                FieldKind::Media => {}
                _ => state.set_text(&field.id, "answer"),
            }
        }
        state
    }

    #[test]
    fn canonical_schema_is_consistent() {
        let schema = teacher_application().unwrap();
        assert_eq!(schema.sections().len(), 5);
        assert!(schema.is_list_field(SUBJECTS_FIELD));
        assert!(schema.is_list_field(TIME_SLOTS_FIELD));
        assert_eq!(schema.media_field().unwrap().id, VIDEO_FIELD);
    }

    #[test]
    fn complete_form_without_video_reports_only_video() {
        let schema = teacher_application().unwrap();
        let errors = validate(&complete_form(), schema.required_ids());
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key(VIDEO_FIELD));
    }

    #[test]
    fn optional_fields_are_not_required() {
        let schema = teacher_application().unwrap();
        let required = schema.required_ids();
        for optional in ["gender", "currentEmployment", "otherCommitments"] {
            assert!(!required.contains(&optional));
        }
    }
}

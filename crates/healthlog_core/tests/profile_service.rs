use healthlog_core::db::open_db_in_memory;
use healthlog_core::repo::profile_repo::{ProfileRepository, SqliteProfileRepository};
use healthlog_core::{
    BloodType, ProfileDraft, ProfileService, ProfileValidationError, RepoError, ServiceError,
};
use std::sync::Arc;

fn service() -> ProfileService {
    let service = ProfileService::new(Arc::new(open_db_in_memory().unwrap()));
    service.ensure_ready().unwrap();
    service
}

fn draft() -> ProfileDraft {
    ProfileDraft {
        full_name: "  Maria Souza ".to_string(),
        contact: "+1 (555) 123-4567".to_string(),
        blood_type: "o+".to_string(),
        email: "User@X.COM".to_string(),
        dob: "1990-01-01".to_string(),
    }
}

#[test]
fn display_name_falls_back_to_guest_without_profile() {
    let service = service();
    assert_eq!(service.current().unwrap(), None);
    assert_eq!(service.display_name(), "Guest");
}

#[test]
fn register_normalizes_fields() {
    let service = service();
    let profile = service.register(&draft()).unwrap();

    assert_eq!(profile.full_name, "Maria Souza");
    assert_eq!(profile.blood_type, BloodType::OPos);
    assert_eq!(profile.blood_type.code(), "O+");
    assert_eq!(profile.email, "user@x.com");
    assert_eq!(profile.dob, "1990-01-01");
    assert_eq!(service.display_name(), "Maria Souza");
}

#[test]
fn registering_again_updates_the_single_profile() {
    let db = Arc::new(open_db_in_memory().unwrap());
    let service = ProfileService::new(Arc::clone(&db));
    let first = service.register(&draft()).unwrap();

    let mut changed = draft();
    changed.full_name = "Joao Alvares".to_string();
    changed.blood_type = "AB-".to_string();
    let second = service.register(&changed).unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.blood_type, BloodType::AbNeg);
    let count = db
        .with_conn(|conn| {
            Ok::<_, RepoError>(SqliteProfileRepository::try_new(conn)?.list_profiles()?.len())
        })
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn validation_reports_first_violated_rule_and_writes_nothing() {
    let service = service();
    let cases = [
        (
            ProfileDraft {
                email: "   ".to_string(),
                ..draft()
            },
            ProfileValidationError::MissingFields,
        ),
        (
            ProfileDraft {
                full_name: "R2D2".to_string(),
                contact: "x".to_string(),
                ..draft()
            },
            ProfileValidationError::InvalidFullName,
        ),
        (
            ProfileDraft {
                contact: "12-34".to_string(),
                ..draft()
            },
            ProfileValidationError::InvalidContact,
        ),
        (
            ProfileDraft {
                blood_type: "C+".to_string(),
                ..draft()
            },
            ProfileValidationError::InvalidBloodType,
        ),
        (
            ProfileDraft {
                email: "user@host".to_string(),
                ..draft()
            },
            ProfileValidationError::InvalidEmail,
        ),
        (
            ProfileDraft {
                dob: "01/01/1990".to_string(),
                ..draft()
            },
            ProfileValidationError::InvalidDob,
        ),
    ];

    for (input, expected) in cases {
        match service.register(&input) {
            Err(ServiceError::Validation(actual)) => assert_eq!(actual, expected),
            other => panic!("unexpected result for {expected:?}: {other:?}"),
        }
    }
    assert_eq!(service.current().unwrap(), None);
}

#[test]
fn update_and_delete_target_existing_ids() {
    let service = service();
    let profile = service.register(&draft()).unwrap();

    let mut changed = draft();
    changed.contact = "0800 000 0000".to_string();
    let updated = service.update(profile.id, &changed).unwrap();
    assert_eq!(updated.contact, "0800 000 0000");

    assert!(matches!(
        service.update(profile.id + 1, &changed),
        Err(ServiceError::NotFound { .. })
    ));

    let pending = service.request_delete(profile.id).unwrap();
    service.confirm_delete(pending).unwrap();
    assert_eq!(service.display_name(), "Guest");
}

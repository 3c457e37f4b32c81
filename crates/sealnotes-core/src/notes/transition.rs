//! Encryption state machine.
//!
//! Planning turns a request plus the current record into the note body to
//! persist. It performs all validation and crypto up front and never touches
//! the store, so a rejected transition leaves nothing behind.
//!
//! | from      | to        | needs                                              |
//! |-----------|-----------|----------------------------------------------------|
//! | Plain     | Plain     | nothing                                            |
//! | Plain     | Encrypted | `encryption_password`                              |
//! | Encrypted | Plain     | new `content`, or a current password to decrypt    |
//! | Encrypted | Encrypted | a current password, unless only the title changes  |
//!
//! The current password of an encrypted note is `old_encryption_password`,
//! falling back to `encryption_password`. Whenever an encrypted note stays
//! encrypted and a password was given, its content is re-sealed under a new
//! salt with `encryption_password` (or the current password if none).

use std::fmt;

use secrecy::ExposeSecret;
use tracing::debug;

use crate::error::{NoteError, Result};
use crate::notes::seal::{seal, unseal};
use crate::notes::types::{supplied, NoteCreate, NoteUpdate};
use crate::storage::{NoteBody, NoteRecord, SealedContent};

pub const PASSWORD_REQUIRED_TO_ENCRYPT: &str = "Password is required to encrypt a note";
pub const OLD_PASSWORD_REJECTED: &str =
    "Failed to decrypt with old password. Please make sure it is correct.";
pub const MISSING_SALT_FOR_CHANGE: &str = "Missing encryption salt. Cannot change password.";
pub const PLAINTEXT_REQUIRED: &str =
    "Decrypting a note requires its current password or replacement content";
pub const PASSWORD_REQUIRED_TO_EDIT: &str =
    "Password is required to change the content of an encrypted note";

/// Which way a note's encryption disposition moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    PlainToPlain,
    PlainToEncrypted,
    EncryptedToPlain,
    /// Encrypted note re-sealed under a fresh salt
    Reseal,
    /// Encrypted note whose sealed body is kept as stored
    Untouched,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transition::PlainToPlain => "plain->plain",
            Transition::PlainToEncrypted => "plain->encrypted",
            Transition::EncryptedToPlain => "encrypted->plain",
            Transition::Reseal => "encrypted->encrypted",
            Transition::Untouched => "encrypted (unchanged)",
        };
        f.write_str(name)
    }
}

/// Body for a new note.
#[derive(Debug)]
pub struct CreatePlan {
    pub body: NoteBody,
}

/// Result of planning an update.
#[derive(Debug)]
pub struct UpdatePlan {
    pub title: String,
    pub body: NoteBody,

    /// Caller-supplied plaintext, when the content changed and must be
    /// re-scored
    pub rescore: Option<String>,

    pub transition: Transition,
}

/// Plan the body of a new note.
///
/// # Errors
///
/// `NoteError::InvalidInput` if encryption is requested without a password.
pub fn plan_create(input: &NoteCreate) -> Result<CreatePlan> {
    if !input.is_encrypted {
        return Ok(CreatePlan {
            body: NoteBody::Plain(input.content.clone()),
        });
    }

    let password = supplied(input.encryption_password.as_ref())
        .ok_or_else(|| NoteError::InvalidInput(PASSWORD_REQUIRED_TO_ENCRYPT.to_string()))?;

    let sealed = seal(&input.content, password.expose_secret())?;
    Ok(CreatePlan {
        body: NoteBody::Sealed(sealed),
    })
}

/// Plan an update of `current`.
///
/// # Errors
///
/// `NoteError::InvalidInput` when the transition lacks the password or
/// plaintext it needs, or when the given current password does not open the
/// note.
pub fn plan_update(current: &NoteRecord, update: &NoteUpdate) -> Result<UpdatePlan> {
    let title = update
        .title
        .clone()
        .unwrap_or_else(|| current.title.clone());
    let target_encrypted = update.is_encrypted.unwrap_or(current.is_encrypted());

    let new_password = supplied(update.encryption_password.as_ref());
    let current_password = supplied(update.old_encryption_password.as_ref()).or(new_password);

    let (body, transition) = match (&current.body, target_encrypted) {
        (NoteBody::Plain(existing), false) => {
            let text = update.content.clone().unwrap_or_else(|| existing.clone());
            (NoteBody::Plain(text), Transition::PlainToPlain)
        }

        (NoteBody::Plain(existing), true) => {
            let password = new_password
                .ok_or_else(|| NoteError::InvalidInput(PASSWORD_REQUIRED_TO_ENCRYPT.to_string()))?;
            let text = update.content.as_deref().unwrap_or(existing);
            let sealed = seal(text, password.expose_secret())?;
            (NoteBody::Sealed(sealed), Transition::PlainToEncrypted)
        }

        (NoteBody::Sealed(sealed), false) => {
            // A supplied password is checked even when replacement content is given.
            let decrypted = match current_password {
                Some(password) => Some(open_for_change(sealed, password.expose_secret())?),
                None => None,
            };
            let text = update
                .content
                .clone()
                .or(decrypted)
                .ok_or_else(|| NoteError::InvalidInput(PLAINTEXT_REQUIRED.to_string()))?;
            (NoteBody::Plain(text), Transition::EncryptedToPlain)
        }

        (NoteBody::Sealed(sealed), true) => match current_password {
            None => {
                if update.content.is_some() {
                    return Err(NoteError::InvalidInput(PASSWORD_REQUIRED_TO_EDIT.to_string()));
                }
                (current.body.clone(), Transition::Untouched)
            }
            Some(password) => {
                let decrypted = open_for_change(sealed, password.expose_secret())?;
                let next_password = new_password.unwrap_or(password);
                let text = update.content.as_deref().unwrap_or(&decrypted);
                let resealed = seal(text, next_password.expose_secret())?;
                (NoteBody::Sealed(resealed), Transition::Reseal)
            }
        },
    };

    Ok(UpdatePlan {
        title,
        body,
        rescore: update.content.clone(),
        transition,
    })
}

fn open_for_change(sealed: &SealedContent, password: &str) -> Result<String> {
    let salt = sealed
        .salt
        .as_deref()
        .ok_or_else(|| NoteError::InvalidInput(MISSING_SALT_FOR_CHANGE.to_string()))?;

    unseal(&sealed.token, salt, password).map_err(|err| {
        debug!(error = %err, "current password rejected");
        NoteError::InvalidInput(OLD_PASSWORD_REJECTED.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensitivity::NoteSensitivity;
    use chrono::Utc;
    use secrecy::SecretString;

    fn secret(value: &str) -> Option<SecretString> {
        Some(SecretString::from(value.to_string()))
    }

    fn record(body: NoteBody) -> NoteRecord {
        NoteRecord {
            id: "n1".to_string(),
            owner_id: "o1".to_string(),
            title: "title".to_string(),
            body,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            sensitivity: NoteSensitivity::default(),
        }
    }

    fn plain(text: &str) -> NoteRecord {
        record(NoteBody::Plain(text.to_string()))
    }

    fn encrypted(text: &str, password: &str) -> NoteRecord {
        record(NoteBody::Sealed(seal(text, password).unwrap()))
    }

    fn open(body: &NoteBody, password: &str) -> String {
        match body {
            NoteBody::Sealed(sealed) => {
                unseal(&sealed.token, sealed.salt.as_deref().unwrap(), password).unwrap()
            }
            NoteBody::Plain(_) => panic!("expected a sealed body"),
        }
    }

    fn assert_invalid(result: Result<UpdatePlan>, message: &str) {
        match result {
            Err(NoteError::InvalidInput(actual)) => assert_eq!(actual, message),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_create_plain() {
        let plan = plan_create(&NoteCreate {
            title: "t".to_string(),
            content: "hello".to_string(),
            is_encrypted: false,
            encryption_password: secret("ignored"),
        })
        .unwrap();

        assert_eq!(plan.body, NoteBody::Plain("hello".to_string()));
    }

    #[test]
    fn test_create_encrypted_requires_password() {
        for password in [None, secret("")] {
            let result = plan_create(&NoteCreate {
                title: "t".to_string(),
                content: "hello".to_string(),
                is_encrypted: true,
                encryption_password: password,
            });
            assert!(matches!(result, Err(NoteError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_create_encrypted_seals_content() {
        let plan = plan_create(&NoteCreate {
            title: "t".to_string(),
            content: "hello".to_string(),
            is_encrypted: true,
            encryption_password: secret("pw1"),
        })
        .unwrap();

        assert!(plan.body.salt().is_some());
        assert_eq!(open(&plan.body, "pw1"), "hello");
    }

    #[test]
    fn test_plain_to_plain_replaces_content_and_title() {
        let plan = plan_update(
            &plain("old"),
            &NoteUpdate {
                title: Some("new title".to_string()),
                content: Some("new".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(plan.title, "new title");
        assert_eq!(plan.body, NoteBody::Plain("new".to_string()));
        assert_eq!(plan.rescore.as_deref(), Some("new"));
        assert_eq!(plan.transition, Transition::PlainToPlain);
    }

    #[test]
    fn test_title_only_update_does_not_rescore() {
        let plan = plan_update(
            &plain("old"),
            &NoteUpdate {
                title: Some("renamed".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(plan.body, NoteBody::Plain("old".to_string()));
        assert!(plan.rescore.is_none());
    }

    #[test]
    fn test_plain_to_encrypted_uses_existing_content() {
        let plan = plan_update(
            &plain("hello"),
            &NoteUpdate {
                is_encrypted: Some(true),
                encryption_password: secret("pw1"),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(plan.transition, Transition::PlainToEncrypted);
        assert_eq!(open(&plan.body, "pw1"), "hello");
    }

    #[test]
    fn test_plain_to_encrypted_requires_password() {
        assert_invalid(
            plan_update(
                &plain("hello"),
                &NoteUpdate {
                    is_encrypted: Some(true),
                    ..Default::default()
                },
            ),
            PASSWORD_REQUIRED_TO_ENCRYPT,
        );
    }

    #[test]
    fn test_encrypted_to_plain_decrypts_with_password() {
        let plan = plan_update(
            &encrypted("hello", "pw1"),
            &NoteUpdate {
                is_encrypted: Some(false),
                old_encryption_password: secret("pw1"),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(plan.body, NoteBody::Plain("hello".to_string()));
        assert_eq!(plan.transition, Transition::EncryptedToPlain);
        assert!(plan.rescore.is_none());
    }

    #[test]
    fn test_encrypted_to_plain_with_replacement_content() {
        let plan = plan_update(
            &encrypted("hello", "pw1"),
            &NoteUpdate {
                is_encrypted: Some(false),
                content: Some("fresh".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(plan.body, NoteBody::Plain("fresh".to_string()));
    }

    #[test]
    fn test_encrypted_to_plain_needs_plaintext() {
        assert_invalid(
            plan_update(
                &encrypted("hello", "pw1"),
                &NoteUpdate {
                    is_encrypted: Some(false),
                    ..Default::default()
                },
            ),
            PLAINTEXT_REQUIRED,
        );
    }

    #[test]
    fn test_encrypted_to_plain_verifies_given_password() {
        assert_invalid(
            plan_update(
                &encrypted("hello", "pw1"),
                &NoteUpdate {
                    is_encrypted: Some(false),
                    content: Some("fresh".to_string()),
                    encryption_password: secret("wrong"),
                    ..Default::default()
                },
            ),
            OLD_PASSWORD_REJECTED,
        );
    }

    #[test]
    fn test_rotation_reseals_under_new_salt() {
        let current = encrypted("hello", "pw1");
        let plan = plan_update(
            &current,
            &NoteUpdate {
                old_encryption_password: secret("pw1"),
                encryption_password: secret("pw2"),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(plan.transition, Transition::Reseal);
        assert_ne!(plan.body.salt(), current.body.salt());
        assert_eq!(open(&plan.body, "pw2"), "hello");
    }

    #[test]
    fn test_content_change_with_same_password_reseals() {
        let current = encrypted("hello", "pw1");
        let plan = plan_update(
            &current,
            &NoteUpdate {
                content: Some("changed".to_string()),
                encryption_password: secret("pw1"),
                ..Default::default()
            },
        )
        .unwrap();

        assert_ne!(plan.body.salt(), current.body.salt());
        assert_eq!(open(&plan.body, "pw1"), "changed");
        assert_eq!(plan.rescore.as_deref(), Some("changed"));
    }

    #[test]
    fn test_rotation_with_wrong_old_password() {
        assert_invalid(
            plan_update(
                &encrypted("hello", "pw1"),
                &NoteUpdate {
                    old_encryption_password: secret("nope"),
                    encryption_password: secret("pw2"),
                    ..Default::default()
                },
            ),
            OLD_PASSWORD_REJECTED,
        );
    }

    #[test]
    fn test_rotation_without_salt() {
        let damaged = record(NoteBody::Sealed(SealedContent {
            token: "AQID".to_string(),
            salt: None,
        }));

        assert_invalid(
            plan_update(
                &damaged,
                &NoteUpdate {
                    old_encryption_password: secret("pw1"),
                    ..Default::default()
                },
            ),
            MISSING_SALT_FOR_CHANGE,
        );
    }

    #[test]
    fn test_encrypted_content_change_without_password_rejected() {
        assert_invalid(
            plan_update(
                &encrypted("hello", "pw1"),
                &NoteUpdate {
                    content: Some("sneaky".to_string()),
                    ..Default::default()
                },
            ),
            PASSWORD_REQUIRED_TO_EDIT,
        );
    }

    #[test]
    fn test_encrypted_title_only_change_keeps_body() {
        let current = encrypted("hello", "pw1");
        let plan = plan_update(
            &current,
            &NoteUpdate {
                title: Some("renamed".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(plan.body, current.body);
        assert_eq!(plan.transition, Transition::Untouched);
        assert_eq!(plan.title, "renamed");
    }
}

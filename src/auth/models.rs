use core::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Hash, PartialEq, Eq, Clone, Copy)]
pub enum Role {
    #[serde(rename = "guest")]
    Guest,
    #[serde(rename = "admin")]
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Guest => write!(f, "guest"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// What the identity provider hands us about the signed-in user.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderClaims {
    pub uid: String,
    pub email: Option<String>,
    pub is_anonymous: bool,
    /// Custom `admin` claim on the provider token.
    pub admin: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Identity {
    voter_id: String,
    role: Role,
}

impl Identity {
    pub fn guest(voter_id: impl Into<String>) -> Self {
        Self {
            voter_id: voter_id.into(),
            role: Role::Guest,
        }
    }

    pub fn admin(voter_id: impl Into<String>) -> Self {
        Self {
            voter_id: voter_id.into(),
            role: Role::Admin,
        }
    }

    /// Admin when the provider sets the admin claim or the email matches the
    /// configured admin account. Anonymous sessions are always guests.
    pub fn from_claims(claims: &ProviderClaims, admin_email: &str) -> Self {
        let email_match = claims
            .email
            .as_deref()
            .is_some_and(|email| email.eq_ignore_ascii_case(admin_email));

        if !claims.is_anonymous && (claims.admin || email_match) {
            Self::admin(&claims.uid)
        } else {
            Self::guest(&claims.uid)
        }
    }

    pub fn voter_id(&self) -> &str {
        &self.voter_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

use serde::Deserialize;
use std::fmt;

/// Account type the credentials belong to.
///
/// Both modes share the credential flow; they only differ in the
/// user-login exchange, which is looked up in [`ModeProfile`].
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    /// Official account (公众号)
    #[default]
    H5,
    /// Mini program (小程序)
    Mp,
}

/// Endpoint and field mapping for one [`AppMode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeProfile {
    pub credential_grant_type: &'static str,
    /// Appended to `sns_url`
    pub login_path: &'static str,
    /// Query parameter carrying the user's one-time code
    pub login_code_param: &'static str,
    pub login_grant_type: &'static str,
}

static H5_PROFILE: ModeProfile = ModeProfile {
    credential_grant_type: "client_credential",
    login_path: "/oauth2/access_token",
    login_code_param: "code",
    login_grant_type: "authorization_code",
};

static MP_PROFILE: ModeProfile = ModeProfile {
    credential_grant_type: "client_credential",
    login_path: "/jscode2session",
    login_code_param: "js_code",
    login_grant_type: "authorization_code",
};

impl AppMode {
    pub fn profile(&self) -> &'static ModeProfile {
        match self {
            AppMode::H5 => &H5_PROFILE,
            AppMode::Mp => &MP_PROFILE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AppMode::H5 => "h5",
            AppMode::Mp => "mp",
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

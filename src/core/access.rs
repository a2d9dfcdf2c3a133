//! Access business logic - which ways of getting a product are offered, the
//! trial/free-access request form, and the platform links shown once access
//! is granted.

use crate::api::ApiClient;
use crate::core::validation::{ValidationErrors, require_email, require_min_len};
use crate::entities::Product;
use crate::entities::purchase::{AccessOrganization, AccessRequest};
use crate::errors::{Error, Result};
use tracing::info;

/// Access actions offered on a product's detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessOptions {
    /// Free product with nothing to provision: download links show immediately
    pub granted: bool,
    /// Paid product offering a trial request
    pub trial: bool,
    /// Free product that still needs an account
    pub free_access: bool,
    /// Paid product; checkout is offered
    pub buy: bool,
}

impl AccessOptions {
    /// Actions available for `product`.
    #[must_use]
    pub const fn for_product(product: &Product) -> Self {
        Self {
            granted: product.is_free && !product.requires_account,
            trial: !product.is_free && product.has_trial_usage,
            free_access: product.is_free && product.requires_account,
            buy: !product.is_free,
        }
    }

    /// Notice shown above the access buttons, if any.
    #[must_use]
    pub const fn notice(&self, product: &Product) -> Option<&'static str> {
        if self.granted || !product.is_free {
            return None;
        }
        if product.requires_account {
            Some("A Login account is required to use this application.")
        } else if self.trial {
            Some("Start a free trial to test this application.")
        } else {
            None
        }
    }
}

/// Platform a download or access link targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Windows installer
    Windows,
    /// macOS installer
    MacOs,
    /// Linux package
    Linux,
    /// Play Store listing
    PlayStore,
    /// Direct APK download
    AndroidApk,
    /// App Store listing
    AppStore,
    /// Hosted web app
    Web,
}

impl Platform {
    /// Button label on the access card.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Windows => "Download for Windows",
            Self::MacOs => "Download for macOS",
            Self::Linux => "Download for Linux",
            Self::PlayStore => "Get on Play Store",
            Self::AndroidApk => "Download APK",
            Self::AppStore => "Download on App Store",
            Self::Web => "Open Web App",
        }
    }
}

/// A platform and the link that opens or downloads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformLink {
    /// Target platform
    pub platform: Platform,
    /// Download, store or web-app URL
    pub url: String,
}

/// Links for every platform marked available that also has a URL, in the
/// order the access card lists them.
#[must_use]
pub fn download_links(product: &Product) -> Vec<PlatformLink> {
    let Some(platforms) = product.platforms.as_ref() else {
        return Vec::new();
    };
    let mut candidates: Vec<(Platform, bool, Option<&String>)> = Vec::new();

    if let Some(desktop) = platforms.desktop.as_ref() {
        for (platform, build) in [
            (Platform::Windows, &desktop.windows),
            (Platform::MacOs, &desktop.macos),
            (Platform::Linux, &desktop.linux),
        ] {
            if let Some(build) = build {
                candidates.push((platform, build.available, build.download_url.as_ref()));
            }
        }
    }
    if let Some(mobile) = platforms.mobile.as_ref() {
        if let Some(android) = mobile.android.as_ref() {
            candidates.push((Platform::PlayStore, android.available, android.play_store_url.as_ref()));
            candidates.push((Platform::AndroidApk, android.available, android.apk_url.as_ref()));
        }
        if let Some(ios) = mobile.ios.as_ref() {
            candidates.push((Platform::AppStore, ios.available, ios.app_store_url.as_ref()));
        }
    }
    if let Some(web) = platforms.web.as_ref() {
        candidates.push((Platform::Web, web.available, web.web_app_url.as_ref()));
    }

    candidates
        .into_iter()
        .filter_map(|(platform, available, url)| {
            url.filter(|u| available && !u.is_empty())
                .map(|u| PlatformLink {
                    platform,
                    url: u.clone(),
                })
        })
        .collect()
}

/// Which access request the form submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// `POST /purchases/trial`
    Trial,
    /// `POST /purchases/free-access`
    Free,
}

impl AccessMode {
    /// Toast shown once the request is accepted.
    #[must_use]
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::Trial => "Trial request submitted successfully!",
            Self::Free => "Access granted successfully!",
        }
    }
}

/// Raw input of the trial/free-access dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRequestForm {
    /// Organization requesting access
    pub organization_name: String,
    /// Contact email; also the account login
    pub organization_email: String,
    /// Contact number as typed
    pub phone_number: String,
    /// Terms checkbox
    pub agreed_to_terms: bool,
}

impl AccessRequestForm {
    /// Builds the request body, or the field errors. Terms must be accepted first.
    pub fn validate(&self, product_id: &str) -> Result<AccessRequest> {
        let mut errors = ValidationErrors::new();
        if !self.agreed_to_terms {
            errors.add("terms", "You must agree to the Terms of Use and Privacy Policy");
            return Err(Error::Validation(errors));
        }
        let organization_details = AccessOrganization {
            organization_name: require_min_len(
                &mut errors,
                "organizationName",
                &self.organization_name,
                2,
                "Organization name must be at least 2 characters",
            ),
            organization_email: require_email(
                &mut errors,
                "organizationEmail",
                &self.organization_email,
                "Invalid email address",
            ),
            phone_number: require_min_len(
                &mut errors,
                "phoneNumber",
                &self.phone_number,
                10,
                "Phone number must be at least 10 digits",
            ),
        };
        errors.into_result(AccessRequest {
            product_id: product_id.to_string(),
            organization_details,
        })
    }
}

/// Validates the form and submits the trial or free-access request.
///
/// Returns the toast text for a successful request.
pub async fn request_access(
    api: &ApiClient,
    mode: AccessMode,
    product_id: &str,
    form: &AccessRequestForm,
) -> Result<&'static str> {
    let request = form.validate(product_id)?;
    match mode {
        AccessMode::Trial => api.request_trial(&request).await?,
        AccessMode::Free => api.request_free_access(&request).await?,
    };
    info!("{:?} access request accepted for {}", mode, product_id);
    Ok(mode.success_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::product::{AndroidBuild, DesktopBuild, DesktopPlatforms, MobilePlatforms, WebPlatform};
    use crate::entities::Platforms;
    use crate::test_utils::{api_client_for, free_product, init_test_tracing, paid_product};
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    fn form() -> AccessRequestForm {
        AccessRequestForm {
            organization_name: "Acme Pharmacy".to_string(),
            organization_email: "ops@acme.test".to_string(),
            phone_number: "0241234567".to_string(),
            agreed_to_terms: true,
        }
    }

    #[test]
    fn test_access_options_matrix() {
        let open = free_product("a", "Open");
        let options = AccessOptions::for_product(&open);
        assert!(options.granted && !options.free_access && !options.trial && !options.buy);

        let mut account = free_product("b", "Account");
        account.requires_account = true;
        let options = AccessOptions::for_product(&account);
        assert!(!options.granted && options.free_access && !options.buy);
        assert_eq!(
            options.notice(&account),
            Some("A Login account is required to use this application.")
        );

        let mut trial = paid_product("c", "Trial", 100.0);
        trial.has_trial_usage = true;
        let options = AccessOptions::for_product(&trial);
        assert!(options.trial && options.buy && !options.granted);
        assert_eq!(options.notice(&trial), None);
    }

    #[test]
    fn test_download_links_skip_unavailable_and_missing_urls() {
        let mut product = free_product("a", "Tool");
        product.platforms = Some(Platforms {
            desktop: Some(DesktopPlatforms {
                windows: Some(DesktopBuild {
                    available: true,
                    download_url: Some("https://dl.test/win.exe".to_string()),
                }),
                macos: Some(DesktopBuild {
                    available: false,
                    download_url: Some("https://dl.test/mac.dmg".to_string()),
                }),
                linux: Some(DesktopBuild {
                    available: true,
                    download_url: None,
                }),
            }),
            mobile: Some(MobilePlatforms {
                android: Some(AndroidBuild {
                    available: true,
                    play_store_url: None,
                    apk_url: Some("https://dl.test/app.apk".to_string()),
                }),
                ios: None,
            }),
            web: Some(WebPlatform {
                available: true,
                web_app_url: Some("https://app.test".to_string()),
            }),
        });

        let platforms: Vec<Platform> = download_links(&product).iter().map(|l| l.platform).collect();
        assert_eq!(
            platforms,
            vec![Platform::Windows, Platform::AndroidApk, Platform::Web]
        );
        assert!(download_links(&paid_product("b", "None", 1.0)).is_empty());
    }

    #[test]
    fn test_form_requires_terms_before_anything_else() {
        let form = AccessRequestForm {
            agreed_to_terms: false,
            organization_name: String::new(),
            ..form()
        };
        match form.validate("app-1") {
            Err(Error::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.contains("terms"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_form_field_rules() {
        let short = AccessRequestForm {
            organization_name: "A".to_string(),
            phone_number: "02412".to_string(),
            ..form()
        };
        match short.validate("app-1") {
            Err(Error::Validation(errors)) => {
                assert_eq!(
                    errors.get("organizationName"),
                    Some("Organization name must be at least 2 characters")
                );
                assert_eq!(
                    errors.get("phoneNumber"),
                    Some("Phone number must be at least 10 digits")
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_request_access_routes_by_mode() -> Result<()> {
        init_test_tracing();
        let server = MockServer::start_async().await;
        let trial = server.mock(|when, then| {
            when.method(POST).path("/purchases/trial");
            then.status(201).json_body(json!({}));
        });
        let free = server.mock(|when, then| {
            when.method(POST).path("/purchases/free-access");
            then.status(201).json_body(json!({ "message": "ok" }));
        });

        let api = api_client_for(&server);
        assert_eq!(
            request_access(&api, AccessMode::Trial, "app-1", &form()).await?,
            "Trial request submitted successfully!"
        );
        assert_eq!(
            request_access(&api, AccessMode::Free, "app-2", &form()).await?,
            "Access granted successfully!"
        );
        trial.assert();
        free.assert();
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_network() -> Result<()> {
        let server = MockServer::start_async().await;
        let trial = server.mock(|when, then| {
            when.method(POST).path("/purchases/trial");
            then.status(201);
        });

        let api = api_client_for(&server);
        let bad = AccessRequestForm {
            organization_email: "nope".to_string(),
            ..form()
        };
        assert!(request_access(&api, AccessMode::Trial, "app-1", &bad).await.is_err());
        assert_eq!(trial.hits(), 0);
        Ok(())
    }
}

use crate::domain::entities::SessionClaims;
use crate::domain::errors::CheckinError;
use crate::domain::ports::Clock;
use crate::domain::token;

// Response returned by the PIN verification use case.
pub struct VerifyPinResponse {
    pub token: String,
    pub claims: SessionClaims,
}

// PIN verification use case. Missing configuration is reported before the PIN is checked.
pub struct VerifyPinUseCase<'a, C> {
    pub clock: C,
    pub expected_pin: Option<&'a str>,
    pub secret: Option<&'a str>,
}

impl<C> VerifyPinUseCase<'_, C>
where
    C: Clock,
{
    pub fn execute(&self, submitted_pin: &str) -> Result<VerifyPinResponse, CheckinError> {
        let (Some(expected_pin), Some(secret)) = (self.expected_pin, self.secret) else {
            return Err(CheckinError::MissingConfig(
                "Server not configured (missing env vars).",
            ));
        };

        // Plain equality; the PIN is a shared low-entropy code, not a credential per user.
        if submitted_pin.trim() != expected_pin.trim() {
            return Err(CheckinError::InvalidPin);
        }

        let claims = SessionClaims {
            iat: u64::try_from(self.clock.now().timestamp_millis()).unwrap_or_default(),
        };
        let token = token::sign(&claims, secret)
            .map_err(|err| CheckinError::Internal(err.to_string()))?;

        Ok(VerifyPinResponse { token, claims })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::FixedClock;

    fn use_case<'a>(
        expected_pin: Option<&'a str>,
        secret: Option<&'a str>,
    ) -> VerifyPinUseCase<'a, FixedClock> {
        VerifyPinUseCase {
            clock: FixedClock::at_millis(1_700_000_000_123),
            expected_pin,
            secret,
        }
    }

    #[test]
    fn when_pin_matches_then_token_carries_issue_time_and_verifies() {
        let result = use_case(Some("4321"), Some("secret"))
            .execute("4321")
            .expect("expected pin verification to succeed");

        assert_eq!(result.claims.iat, 1_700_000_000_123);
        assert!(token::verify(&result.token, "secret"));
    }

    #[test]
    fn when_pins_differ_only_by_surrounding_whitespace_then_verification_succeeds() {
        let result = use_case(Some(" 4321\n"), Some("secret")).execute("  4321 ");

        assert!(result.is_ok());
    }

    #[test]
    fn when_pin_is_wrong_then_returns_invalid_pin() {
        let result = use_case(Some("4321"), Some("secret")).execute("0000");

        assert!(matches!(result, Err(CheckinError::InvalidPin)));
    }

    #[test]
    fn when_pin_is_empty_then_returns_invalid_pin() {
        let result = use_case(Some("4321"), Some("secret")).execute("");

        assert!(matches!(result, Err(CheckinError::InvalidPin)));
    }

    #[test]
    fn when_expected_pin_is_missing_then_returns_missing_config() {
        let result = use_case(None, Some("secret")).execute("4321");

        assert!(matches!(result, Err(CheckinError::MissingConfig(_))));
    }

    #[test]
    fn when_secret_is_missing_then_returns_missing_config_even_for_wrong_pin() {
        let result = use_case(Some("4321"), None).execute("0000");

        assert!(matches!(result, Err(CheckinError::MissingConfig(_))));
    }
}

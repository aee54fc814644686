use marquee_core::{IdentityType, SecurityIdentity};
use marquee_domain::{CustomerAccount, EmailAddress, validate_password};

use crate::item_store::to_item;

use super::*;

impl SecurityService {
    /// Registers a storefront customer account and signs it in.
    pub async fn sign_up_customer(&self, input: CustomerSignUpInput) -> AppResult<IssuedToken> {
        let email = EmailAddress::new(input.email)?;
        validate_password(&input.password)?;
        let password_hash = self.password_hasher.hash_password(&input.password)?;
        let account = CustomerAccount::new(
            email,
            input.first_name,
            input.last_name,
            input.phone,
            password_hash,
        )?;

        self.store
            .insert(to_item(
                keys::customer_account(account.email().as_str()),
                keys::RECORD,
                &account,
            )?)
            .await
            .map_err(|error| match error {
                AppError::Conflict(_) => AppError::Conflict(format!(
                    "customer '{}' already exists",
                    account.email().as_str()
                )),
                other => other,
            })?;

        self.issue_token(customer_identity(&account), true).await
    }

    /// Verifies customer credentials and issues a customer token.
    pub async fn sign_in_customer(&self, email: &str, password: &str) -> AppResult<IssuedToken> {
        let account: Option<CustomerAccount> = get_as(
            self.store.as_ref(),
            &keys::customer_account(&email.trim().to_lowercase()),
            keys::RECORD,
        )
        .await?;
        let Some(account) = account else {
            return Err(Self::invalid_credentials());
        };

        if !self
            .password_hasher
            .verify_password(password, account.password_hash())?
        {
            return Err(Self::invalid_credentials());
        }

        self.issue_token(customer_identity(&account), true).await
    }
}

fn customer_identity(account: &CustomerAccount) -> SecurityIdentity {
    SecurityIdentity::new(
        account.id(),
        IdentityType::Customer,
        format!("{} {}", account.first_name(), account.last_name()),
    )
    .with_profile(
        account.first_name(),
        account.last_name(),
        Some(account.email().as_str().to_owned()),
        account.phone().map(str::to_owned),
    )
}

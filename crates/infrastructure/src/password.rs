use application::{PasswordHasher, PasswordHasherError};
use async_trait::async_trait;
use bcrypt::{hash, verify, DEFAULT_COST};
use domain::PasswordHash;
use sha2::{Digest, Sha512_256};

/// 固定摘要 + 自适应哈希的密码流水线。
///
/// bcrypt 的输入永远是明文的 SHA-512/256 摘要（去掉末尾零字节），
/// 明文本身不进入 bcrypt。
#[derive(Clone)]
pub struct ShaBcryptHasher {
    cost: u32,
}

impl ShaBcryptHasher {
    pub fn new(cost: Option<u32>) -> Self {
        Self {
            cost: cost.unwrap_or(DEFAULT_COST),
        }
    }
}

fn prepare(plaintext: &str) -> Vec<u8> {
    let digest = Sha512_256::digest(plaintext.as_bytes());
    let end = digest
        .iter()
        .rposition(|byte| *byte != 0)
        .map_or(0, |pos| pos + 1);
    digest[..end].to_vec()
}

#[async_trait]
impl PasswordHasher for ShaBcryptHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        let cost = self.cost;
        let prepared = prepare(plaintext);
        let hashed = tokio::task::spawn_blocking(move || hash(prepared, cost))
            .await
            .map_err(|err| PasswordHasherError::hash_error(err.to_string()))
            .and_then(|res| res.map_err(|err| PasswordHasherError::hash_error(err.to_string())))?;

        PasswordHash::new(hashed).map_err(|err| PasswordHasherError::hash_error(err.to_string()))
    }

    async fn verify(
        &self,
        plaintext: &str,
        hashed: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let prepared = prepare(plaintext);
        let hashed = hashed.as_str().to_owned();
        tokio::task::spawn_blocking(move || verify(prepared, &hashed))
            .await
            .map_err(|err| PasswordHasherError::verify_error(err.to_string()))
            .and_then(|res| res.map_err(|err| PasswordHasherError::verify_error(err.to_string())))
    }
}

impl Default for ShaBcryptHasher {
    fn default() -> Self {
        Self::new(Some(DEFAULT_COST))
    }
}

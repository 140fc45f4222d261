use crate::error::PowError;
use crate::profile::PowProfile;
use crate::target::Target;
use crate::{BlockHeader, Hash256};
use rayon::prelude::*;
use tracing::{debug, info};

/// A header whose proof-of-work hash meets its own target.
#[derive(Clone, Copy, Debug)]
pub struct Mined {
    pub header: BlockHeader,
    pub pow_hash: Hash256,
}

/// Searches nonces `start_nonce..=u32::MAX` in parallel for a header whose PoW hash
/// meets the target encoded in `template.bits`.
///
/// Returns `Ok(None)` when the nonce range is exhausted; the caller should bump
/// `time` (or change the merkle root) and search again.
pub fn mine_header(
    template: &BlockHeader,
    profile: PowProfile,
    start_nonce: u32,
) -> Result<Option<Mined>, PowError> {
    let target = Target::from_compact(template.bits)?;
    debug!(
        ?profile,
        params = ?profile.params(),
        %target,
        start_nonce,
        "searching nonce space"
    );

    // Every attempt hashes its own copy; only the nonce varies.
    let base = *template;
    let found = (start_nonce..=u32::MAX).into_par_iter().find_any(|nonce| {
        let mut h = base;
        h.nonce = *nonce;
        target.is_met_by(&h.pow_hash(profile))
    });

    let Some(nonce) = found else {
        debug!(start_nonce, "nonce space exhausted");
        return Ok(None);
    };

    let mut header = base;
    header.nonce = nonce;
    header.clear_identity_cache();
    let pow_hash = header.pow_hash(profile);

    info!(
        "Mined header {} with nonce {} and pow hash {}",
        header.compute_identity_hash(),
        nonce,
        pow_hash
    );

    Ok(Some(Mined { header, pow_hash }))
}

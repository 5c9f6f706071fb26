//! Address block carving.
//!
//! This file contains the pure address arithmetic used by the design
//! builder: splitting a shared supermask into equal blocks selected by a
//! network identifier, and computing host addresses inside a block. Because
//! every result is a function of its inputs only, independent floor designs
//! that share one physical range land on disjoint blocks as long as they use
//! distinct `net_id` values.

use crate::error::DesignError;
use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;

/// Number of addresses covered by a prefix length
fn block_size(prefix: u8) -> u64 {
    1u64 << (32 - u32::from(prefix))
}

/// Normalise a network so the address part has no host bits set
pub fn normalize(network: Ipv4Network) -> Ipv4Network {
    let size = block_size(network.prefix());
    let base = u64::from(u32::from(network.ip())) & !(size - 1);
    // base fits in 32 bits because the mask only clears bits
    Ipv4Network::new(Ipv4Addr::from(base as u32), network.prefix()).unwrap_or(network)
}

/// Number of `block_prefix` blocks contained in `base`
pub fn block_count(base: Ipv4Network, block_prefix: u8) -> Result<u64, DesignError> {
    if block_prefix < base.prefix() || block_prefix > 32 {
        return Err(DesignError::InvalidPrefix { base, block_prefix });
    }
    Ok(1u64 << (block_prefix - base.prefix()))
}

/// Return the `net_id`-th block (1-indexed) of `base` split into blocks of
/// `block_prefix` length.
///
/// # Examples
///
/// ```
/// use floornet::ip::planner::carve;
///
/// let base = "172.20.20.0/24".parse().unwrap();
/// let block = carve(base, 28, 2).unwrap();
/// assert_eq!(block.to_string(), "172.20.20.16/28");
/// ```
pub fn carve(base: Ipv4Network, block_prefix: u8, net_id: u32) -> Result<Ipv4Network, DesignError> {
    let base = normalize(base);
    let available = block_count(base, block_prefix)?;

    if net_id == 0 || u64::from(net_id) > available {
        return Err(DesignError::OutOfRange {
            base,
            block_prefix,
            net_id,
            available,
        });
    }

    let start = u64::from(u32::from(base.network())) + (u64::from(net_id) - 1) * block_size(block_prefix);
    let start = u32::try_from(start).map_err(|_| DesignError::OutOfRange {
        base,
        block_prefix,
        net_id,
        available,
    })?;

    Ipv4Network::new(Ipv4Addr::from(start), block_prefix)
        .map_err(|_| DesignError::InvalidPrefix { base, block_prefix })
}

/// Return `block.network + offset`, failing when the address leaves the block
pub fn host_address(block: Ipv4Network, offset: u32) -> Result<Ipv4Addr, DesignError> {
    let block = normalize(block);
    if u64::from(offset) >= block_size(block.prefix()) {
        return Err(DesignError::OffsetOverflow { block, offset });
    }
    // offset is below the block size, and the block ends inside the address space
    Ok(Ipv4Addr::from(u32::from(block.network()) + offset))
}

/// Host address at `offset` in `block`, presented with an explicit interface
/// prefix length (e.g. a /28 management block addressed as /24).
pub fn interface_address(block: Ipv4Network, offset: u32, prefix_len: u8) -> Result<Ipv4Network, DesignError> {
    let host = host_address(block, offset)?;
    Ipv4Network::new(host, prefix_len).map_err(|_| DesignError::InvalidPrefix {
        base: block,
        block_prefix: prefix_len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> Ipv4Network {
        s.parse().unwrap()
    }

    #[test]
    fn test_carve_first_block() {
        let block = carve(net("172.20.20.0/24"), 28, 1).unwrap();
        assert_eq!(block, net("172.20.20.0/28"));
    }

    #[test]
    fn test_carve_blocks_are_contiguous_and_disjoint() {
        let base = net("172.20.20.0/24");
        let count = block_count(base, 28).unwrap() as u32;
        assert_eq!(count, 16);

        let blocks: Vec<Ipv4Network> = (1..=count).map(|id| carve(base, 28, id).unwrap()).collect();
        for pair in blocks.windows(2) {
            let end_of_first = u32::from(pair[0].network()) + 16;
            assert_eq!(end_of_first, u32::from(pair[1].network()));
            assert!(!pair[0].contains(pair[1].network()));
        }
        assert_eq!(blocks.last().unwrap(), &net("172.20.20.240/28"));
    }

    #[test]
    fn test_carve_is_repeatable() {
        let base = net("172.20.20.0/24");
        for id in 1..=16 {
            assert_eq!(carve(base, 28, id).unwrap(), carve(base, 28, id).unwrap());
        }
    }

    #[test]
    fn test_carve_out_of_range() {
        let base = net("172.20.20.0/24");
        assert!(matches!(
            carve(base, 28, 17),
            Err(DesignError::OutOfRange { net_id: 17, available: 16, .. })
        ));
        assert!(matches!(carve(base, 28, 0), Err(DesignError::OutOfRange { .. })));
    }

    #[test]
    fn test_carve_invalid_prefix() {
        let base = net("172.20.20.0/24");
        assert!(matches!(carve(base, 20, 1), Err(DesignError::InvalidPrefix { .. })));
        assert!(matches!(carve(base, 33, 1), Err(DesignError::InvalidPrefix { .. })));
    }

    #[test]
    fn test_carve_normalizes_host_bits() {
        let block = carve(net("172.20.20.77/24"), 28, 1).unwrap();
        assert_eq!(block, net("172.20.20.0/28"));
    }

    #[test]
    fn test_host_address() {
        let block = net("172.20.20.0/28");
        assert_eq!(host_address(block, 2).unwrap(), Ipv4Addr::new(172, 20, 20, 2));
        assert_eq!(host_address(block, 3).unwrap(), Ipv4Addr::new(172, 20, 20, 3));
        assert_eq!(host_address(block, 15).unwrap(), Ipv4Addr::new(172, 20, 20, 15));
    }

    #[test]
    fn test_host_address_overflow() {
        let block = net("172.20.20.16/28");
        assert!(matches!(
            host_address(block, 16),
            Err(DesignError::OffsetOverflow { offset: 16, .. })
        ));
    }

    #[test]
    fn test_interface_address_uses_requested_prefix() {
        let block = carve(net("172.20.20.0/24"), 28, 2).unwrap();
        let addr = interface_address(block, 2, 24).unwrap();
        assert_eq!(addr.to_string(), "172.20.20.18/24");
    }
}

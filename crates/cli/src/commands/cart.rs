//! Cart commands: price a cart and place an order.
//!
//! The cart lives in process memory, so one invocation carries the whole
//! flow: fetch the menu, build the lines from `--item` specs, then price
//! or check out.

use gursha_client::stores::CartStore;
use gursha_core::{AddressId, CurrencyCode, MenuItemId, Money, PaymentMethodId, RestaurantId};
use rust_decimal::Decimal;

use super::{CliError, Context};

/// Price a cart without placing an order.
pub async fn show(restaurant_id: &str, items: &[String]) -> Result<(), CliError> {
    let context = Context::load().await?;
    let cart = build_cart(&context, &RestaurantId::new(restaurant_id), items).await?;

    for line in cart.items() {
        tracing::info!(
            "{} x{} - {}",
            line.menu_item.name,
            line.quantity,
            line.line_total().display()
        );
    }
    tracing::info!(
        "Subtotal: {} ({} items)",
        cart.subtotal().display(),
        cart.item_count()
    );
    Ok(())
}

/// Check out the cart as an order.
pub async fn checkout(
    restaurant_id: &str,
    items: &[String],
    address: &str,
    payment: &str,
    tip: Option<&str>,
) -> Result<(), CliError> {
    let context = Context::load().await?;
    context.require_session()?;

    let mut cart = build_cart(&context, &RestaurantId::new(restaurant_id), items).await?;
    if let Some(tip) = tip {
        cart.set_tip(parse_tip(tip)?);
    }

    let order = cart
        .checkout(
            Some(&AddressId::new(address)),
            Some(&PaymentMethodId::new(payment)),
        )
        .await?;

    tracing::info!(
        "Order {} placed: {} ({} lines, total {})",
        order.id,
        order.status,
        order.lines.len(),
        order.total.display()
    );
    Ok(())
}

/// Resolve the `--item` specs against the restaurant's menu and build the
/// cart. Unknown items and cart-policy violations (unavailable item,
/// cross-restaurant line) surface here, before any order is placed.
async fn build_cart(
    context: &Context,
    restaurant_id: &RestaurantId,
    items: &[String],
) -> Result<CartStore, CliError> {
    let menu = context.gateway.menu(restaurant_id).await?;
    let mut cart = CartStore::new(context.gateway.clone());

    for spec in items {
        let (item_id, quantity) = parse_item_spec(spec)?;
        let menu_item = menu
            .iter()
            .find(|m| m.id == item_id)
            .cloned()
            .ok_or_else(|| CliError::UnknownMenuItem(item_id.to_string()))?;
        cart.add_item(menu_item, quantity, None)?;
    }
    Ok(cart)
}

fn parse_item_spec(spec: &str) -> Result<(MenuItemId, u32), CliError> {
    let (id, quantity) = spec
        .split_once(':')
        .ok_or_else(|| CliError::BadItemSpec(spec.to_string()))?;
    if id.is_empty() {
        return Err(CliError::BadItemSpec(spec.to_string()));
    }
    let quantity: u32 = quantity
        .parse()
        .map_err(|_| CliError::BadItemSpec(spec.to_string()))?;
    Ok((MenuItemId::new(id), quantity))
}

fn parse_tip(raw: &str) -> Result<Money, CliError> {
    let amount: Decimal = raw.parse().map_err(|_| CliError::BadTip(raw.to_string()))?;
    if amount.is_sign_negative() {
        return Err(CliError::BadTip(raw.to_string()));
    }
    Ok(Money::new(amount, CurrencyCode::ETB))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_spec() {
        let (id, quantity) = parse_item_spec("itm_1:2").unwrap();
        assert_eq!(id, MenuItemId::new("itm_1"));
        assert_eq!(quantity, 2);
    }

    #[test]
    fn test_parse_item_spec_rejects_malformed() {
        for spec in ["itm_1", ":2", "itm_1:two", "itm_1:", "itm_1:-1"] {
            assert!(matches!(
                parse_item_spec(spec),
                Err(CliError::BadItemSpec(_))
            ));
        }
    }

    #[test]
    fn test_parse_tip() {
        assert_eq!(
            parse_tip("5.00").unwrap(),
            Money::new(Decimal::new(500, 2), CurrencyCode::ETB)
        );
        assert!(matches!(parse_tip("-1"), Err(CliError::BadTip(_))));
        assert!(matches!(parse_tip("soup"), Err(CliError::BadTip(_))));
    }
}

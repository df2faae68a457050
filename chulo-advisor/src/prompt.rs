use crate::models::PricingRequest;

/// Render the natural-language instruction sent to the generative backend
pub fn render_prompt(request: &PricingRequest) -> String {
    format!(
        r#"You are a pricing analyst for a restaurant. Suggest a new menu price that maximizes expected profit while minimizing waste.

Product: {name}
Current stock: {stock} units
Popularity score: {popularity} (1 = slow seller, 10 = fast seller)
Spoilage risk: {spoilage}
Current price: {price:.2}

Guidelines:
- High stock with low popularity: lean toward a lower price to clear inventory and stimulate demand.
- Low stock with high popularity: lean toward a higher price to capture willingness to pay and avoid running out.
- High spoilage risk: lean toward a lower price so the product sells before it loses value. Spoilage risk outweighs stock and popularity, and a high-spoilage product must never get a higher price.

Respond with a single JSON object and nothing else:
{{"suggestedPrice": <positive number>, "reasoning": "<one short paragraph>"}}

The reasoning must begin with "Raise the price", "Lower the price" or "Hold the price", matching the suggested price, and must mention the stock, popularity and spoilage signals."#,
        name = request.product_name(),
        stock = request.current_stock_qty(),
        popularity = request.popularity_score(),
        spoilage = request.spoilage_risk(),
        price = request.current_price(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_all_inputs() {
        let request = PricingRequest::new("Chicken Momo", 50, 10.0, "high", 250.0).unwrap();
        let prompt = render_prompt(&request);

        assert!(prompt.contains("Product: Chicken Momo"));
        assert!(prompt.contains("Current stock: 50 units"));
        assert!(prompt.contains("Popularity score: 10 "));
        assert!(prompt.contains("Spoilage risk: high"));
        assert!(prompt.contains("Current price: 250.00"));
        assert!(prompt.contains(r#"{"suggestedPrice": <positive number>"#));
    }
}

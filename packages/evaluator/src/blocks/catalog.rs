//! Product and food blocks: ingredients, product grid, nutrition facts and
//! recipe cards.

use super::props::{field, object, PropsExt};
use super::{anchor, image};
use crate::render::RenderContext;
use crate::style::{font_size, font_stack, StyleDeclaration};
use crate::vdom::VNode;
use pagesmith_common::{ContentBlock, DesignTokens, Props};
use serde_json::{json, Value};

fn titled(class: &str, title: &str, ctx: &RenderContext<'_>) -> VNode {
    let wrapper = VNode::element("div").with_attr("class", class);
    if title.is_empty() {
        return wrapper;
    }
    wrapper.with_child(
        VNode::text_element("h3", title)
            .with_style("font-family", font_stack(&ctx.tokens.typography.heading_font)),
    )
}

/// Entries may be bare strings or `{ "name": ... }` objects
fn entry_label(entry: &Value) -> &str {
    entry
        .as_str()
        .map(str::trim)
        .unwrap_or_else(|| field(entry, "name"))
}

pub(crate) fn ingredients_defaults() -> Props {
    object(json!({
        "title": "Ingredients",
        "items": [],
    }))
}

pub(crate) fn render_ingredients(block: &ContentBlock, ctx: &RenderContext<'_>) -> VNode {
    let props = &block.props;
    let items = props
        .list("items")
        .iter()
        .map(entry_label)
        .filter(|label| !label.is_empty())
        .map(|label| VNode::text_element("li", label));

    titled("ps-ingredients", props.text("title"), ctx)
        .with_child(VNode::element("ul").with_children(items))
}

pub(crate) fn products_defaults() -> Props {
    object(json!({
        "title": "Products",
        "items": [],
    }))
}

pub(crate) fn render_products(block: &ContentBlock, ctx: &RenderContext<'_>) -> VNode {
    let props = &block.props;
    let typography = &ctx.tokens.typography;

    let cards = props.list("items").iter().map(|item| {
        let mut card = VNode::element("article").with_attr("class", "ps-product");
        if let Some(picture) = image(field(item, "imageUrl"), field(item, "name")) {
            card = card.with_child(picture);
        }
        card = card.with_child(VNode::text_element("h4", field(item, "name")));
        if !field(item, "price").is_empty() {
            card = card.with_child(
                VNode::text_element("p", field(item, "price"))
                    .with_attr("class", "ps-product__price")
                    .with_style("font-size", font_size(typography.label_size)),
            );
        }
        if field(item, "href").is_empty() {
            card
        } else {
            anchor(field(item, "href"), card).with_style("color", "var(--link-color)")
        }
    });

    titled("ps-products", props.text("title"), ctx).with_child(
        VNode::element("div")
            .with_attr("class", "ps-products__grid")
            .with_style("display", "grid")
            .with_style("gap", "12px")
            .with_style("grid-template-columns", "repeat(2, minmax(0, 1fr))")
            .with_children(cards),
    )
}

pub(crate) fn nutrition_table_defaults() -> Props {
    object(json!({
        "title": "Nutrition facts",
        "servingSize": "100 g",
        "rows": [
            {"nutrient": "Energy", "amount": "", "dailyValue": ""},
            {"nutrient": "Fat", "amount": "", "dailyValue": ""},
            {"nutrient": "Carbohydrate", "amount": "", "dailyValue": ""},
            {"nutrient": "Protein", "amount": "", "dailyValue": ""},
        ],
    }))
}

pub(crate) fn nutrition_table_style(tokens: &DesignTokens, decl: &mut StyleDeclaration) {
    decl.set("font-family", font_stack(&tokens.typography.label_font));
}

pub(crate) fn render_nutrition_table(block: &ContentBlock, ctx: &RenderContext<'_>) -> VNode {
    let props = &block.props;
    let mut table = VNode::element("table").with_style("width", "100%");

    if !props.text("servingSize").is_empty() {
        table = table.with_child(VNode::text_element(
            "caption",
            format!("Per {}", props.text("servingSize")),
        ));
    }

    let header = VNode::element("tr").with_children(
        ["Nutrient", "Amount", "% DV"]
            .into_iter()
            .map(|label| VNode::text_element("th", label)),
    );
    let rows = props
        .list("rows")
        .iter()
        .filter(|row| !field(row, "nutrient").is_empty())
        .map(|row| {
            VNode::element("tr").with_children(
                ["nutrient", "amount", "dailyValue"]
                    .into_iter()
                    .map(|key| VNode::text_element("td", field(row, key))),
            )
        });

    table = table
        .with_child(VNode::element("thead").with_child(header))
        .with_child(VNode::element("tbody").with_children(rows));

    titled("ps-nutrition", props.text("title"), ctx).with_child(table)
}

pub(crate) fn recipes_defaults() -> Props {
    object(json!({
        "title": "Recipes",
        "recipes": [],
    }))
}

pub(crate) fn render_recipes(block: &ContentBlock, ctx: &RenderContext<'_>) -> VNode {
    let props = &block.props;

    let cards = props
        .list("recipes")
        .iter()
        .filter(|recipe| !field(recipe, "title").is_empty())
        .map(|recipe| {
            let mut card = VNode::element("article").with_attr("class", "ps-recipe");
            if let Some(picture) = image(field(recipe, "imageUrl"), field(recipe, "title")) {
                card = card.with_child(picture);
            }
            card = card.with_child(VNode::text_element("h4", field(recipe, "title")));
            if !field(recipe, "prepTime").is_empty() {
                card = card.with_child(
                    VNode::text_element("p", field(recipe, "prepTime"))
                        .with_attr("class", "ps-recipe__time")
                        .with_style("font-size", font_size(ctx.tokens.typography.label_size)),
                );
            }
            if field(recipe, "href").is_empty() {
                card
            } else {
                anchor(field(recipe, "href"), card)
            }
        });

    titled("ps-recipes", props.text("title"), ctx).with_children(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderSurface;
    use pagesmith_common::{BlockId, BlockType};

    #[test]
    fn test_ingredients_accept_strings_and_objects() {
        let tokens = DesignTokens::default();
        let ctx = RenderContext::new(&tokens, RenderSurface::Viewer);
        let block = ContentBlock::new(
            BlockId::new("c-1"),
            BlockType::Ingredients,
            object(json!({"title": "", "items": ["Flour", {"name": "Sugar"}, "", 3]})),
        );

        let node = render_ingredients(&block, &ctx);
        let list = &node.children()[0];
        assert_eq!(list.children().len(), 2);
        assert_eq!(list.text_content(), "FlourSugar");
    }

    #[test]
    fn test_nutrition_rows_need_a_nutrient() {
        let tokens = DesignTokens::default();
        let ctx = RenderContext::new(&tokens, RenderSurface::Viewer);
        let block = ContentBlock::new(
            BlockId::new("c-2"),
            BlockType::NutritionTable,
            object(json!({"title": "", "servingSize": "", "rows": [
                {"nutrient": "Fat", "amount": "3 g"},
                {"amount": "9 g"}
            ]})),
        );

        let node = render_nutrition_table(&block, &ctx);
        let table = &node.children()[0];
        let body = &table.children()[1];
        assert_eq!(body.children().len(), 1);
    }
}

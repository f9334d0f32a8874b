//! Find-all-references resolution
//!
//! The request flow is flat: classify the document's family, pull the part
//! under the cursor, then dispatch on family, category and mode. `Ok(None)`
//! means the cursor is not on anything resolvable; `Ok(Some(vec![]))` means
//! the query resolved but found nothing, which the editor renders as "no
//! references" instead of falling back to other providers.
//!
//! Search directions are deliberately one way:
//! - selector definitions in stylesheets list their usages across markup
//! - custom properties list matching occurrences across stylesheets only,
//!   so embedded style blocks never double up plain stylesheet hits
//! - definitions inside a `<style>` block list usages in their own page
//!
//! A class token in markup resolves to the empty list rather than walking
//! back to selector definitions; that direction belongs to goto-definition.

use tower_lsp::lsp_types::{Location, Position, Url};

use crate::config::LanguageFamily;
use crate::error::NavResult;
use crate::language::part::{Part, PartCategory, PartConvertor, PartMode, QueryOrigin};
use crate::workspace::Workspace;

impl Workspace {
    /// All reference locations for the symbol at `position`. The origin
    /// occurrence itself is always left out of the result.
    pub async fn find_references(
        &mut self,
        uri: &Url,
        position: Position,
    ) -> NavResult<Option<Vec<Location>>> {
        let Some((family, part)) = self.part_at_position(uri, position).await? else {
            return Ok(None);
        };
        let origin = QueryOrigin::new(uri, &part);
        let results = match family {
            LanguageFamily::Html => self.markup_references(uri, &part, origin).await?,
            LanguageFamily::Css => self.stylesheet_references(&part, origin).await?,
        };
        Ok(Some(results))
    }

    async fn markup_references(
        &mut self,
        uri: &Url,
        part: &Part,
        origin: QueryOrigin<'_>,
    ) -> NavResult<Vec<Location>> {
        let is_style_block_definition = part.mode == PartMode::Definition
            && matches!(
                part.category,
                PartCategory::Selector | PartCategory::CssVariable
            );
        if !is_style_block_definition {
            return Ok(Vec::new());
        }
        self.html_map
            .find_references_in(&mut self.store, uri, part, origin.range_in(uri))
            .await
    }

    async fn stylesheet_references(
        &mut self,
        part: &Part,
        origin: QueryOrigin<'_>,
    ) -> NavResult<Vec<Location>> {
        match part.category {
            PartCategory::Selector if part.mode == PartMode::Definition => {
                self.html_map
                    .find_references(&mut self.store, part, Some(origin))
                    .await
            }
            PartCategory::CssVariable => {
                let key = PartConvertor::to_definition_mode(part);
                self.css_map
                    .find_references(&mut self.store, &key, Some(origin))
                    .await
            }
            _ => Ok(Vec::new()),
        }
    }
}

//! Goto-definition resolution
//!
//! The inverse direction of find-references: usages navigate to definition
//! sites. Class and id tokens, custom element tags and `var()` arguments in
//! markup resolve against stylesheet definitions; with
//! `alsoSearchDefinitionsInStyleTag` enabled the page's own `<style>` blocks
//! contribute as well. In stylesheets only custom properties navigate, since
//! a selector is already its own definition.

use tower_lsp::lsp_types::{Location, Position, Url};

use crate::config::LanguageFamily;
use crate::error::NavResult;
use crate::language::part::{Part, PartCategory, PartConvertor, PartMode, QueryOrigin};
use crate::workspace::Workspace;

impl Workspace {
    /// Definition locations for the symbol at `position`. `Ok(None)` when
    /// the cursor is not on a navigable usage.
    pub async fn find_definitions(
        &mut self,
        uri: &Url,
        position: Position,
    ) -> NavResult<Option<Vec<Location>>> {
        let Some((family, part)) = self.part_at_position(uri, position).await? else {
            return Ok(None);
        };
        self.definition_locations(family, uri, &part).await
    }

    /// Shared by goto-definition and hover. `Ok(None)` when `part` is not
    /// the kind of occurrence that has definition sites.
    pub(crate) async fn definition_locations(
        &mut self,
        family: LanguageFamily,
        uri: &Url,
        part: &Part,
    ) -> NavResult<Option<Vec<Location>>> {
        let origin = QueryOrigin::new(uri, part);
        match family {
            LanguageFamily::Html => {
                if part.mode != PartMode::Reference {
                    return Ok(None);
                }
                let key = PartConvertor::to_definition_mode(part);
                let mut results = self
                    .css_map
                    .find_definitions(&mut self.store, &key, Some(origin))
                    .await?;
                if self.config.also_search_definitions_in_style_tag {
                    let own = self
                        .html_map
                        .find_definitions_in(&mut self.store, uri, &key, origin.range_in(uri))
                        .await?;
                    results.extend(own);
                }
                Ok(Some(results))
            }
            LanguageFamily::Css => {
                if part.category != PartCategory::CssVariable {
                    return Ok(None);
                }
                let key = PartConvertor::to_definition_mode(part);
                let results = self
                    .css_map
                    .find_definitions(&mut self.store, &key, Some(origin))
                    .await?;
                Ok(Some(results))
            }
        }
    }
}

pub mod block;
pub mod page;
pub mod props;

pub mod prelude {
    pub use crate::block::{
        BlockCollection as BlockCollectionEntity,
        FetchBlocksRequest as FetchBlocksRequestEntity,
    };
    pub use crate::page::{
        FetchPageRequest as FetchPageRequestEntity,
        LastEditedTime as LastEditedTimeEntity, Page as PageEntity,
    };
    pub use crate::props::Props as PropsEntity;
}

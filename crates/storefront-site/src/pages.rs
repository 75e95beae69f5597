//! The fixed set of pages a site is built from.

use crate::config::Modules;

/// A generated page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    About,
    Contact,
    Privacy,
    Terms,
    Booking,
    /// Product detail, selected by `?item=`
    Product,
    Blog,
    /// Blog article, selected by `?id=`
    Post,
}

impl Page {
    pub const ALL: [Page; 9] = [
        Page::Home,
        Page::About,
        Page::Contact,
        Page::Privacy,
        Page::Terms,
        Page::Booking,
        Page::Product,
        Page::Blog,
        Page::Post,
    ];

    /// Output file name.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Home => "index.html",
            Self::About => "about.html",
            Self::Contact => "contact.html",
            Self::Privacy => "privacy.html",
            Self::Terms => "terms.html",
            Self::Booking => "booking.html",
            Self::Product => "product.html",
            Self::Blog => "blog.html",
            Self::Post => "post.html",
        }
    }

    /// Title shown in the browser tab.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::Contact => "Contact",
            Self::Privacy => "Privacy",
            Self::Terms => "Terms",
            Self::Booking => "Book Now",
            Self::Product => "Product",
            Self::Blog => "Blog",
            Self::Post => "Article",
        }
    }

    /// Template rendered for this page.
    pub fn template(&self) -> &'static str {
        match self {
            Self::Home => "home.html",
            Self::About => "about.html",
            Self::Contact => "contact.html",
            Self::Privacy | Self::Terms => "legal.html",
            Self::Booking => "booking.html",
            Self::Product => "product.html",
            Self::Blog => "blog.html",
            Self::Post => "post.html",
        }
    }

    /// Blog pages exist only when the blog module is on.
    pub fn is_enabled(&self, modules: &Modules) -> bool {
        match self {
            Self::Blog | Self::Post => modules.blog,
            _ => true,
        }
    }

    /// Detail pages depend on a query string and are left out of the sitemap.
    pub fn in_sitemap(&self) -> bool {
        !matches!(self, Self::Product | Self::Post)
    }

    /// Pages enabled by `modules`, in output order.
    pub fn enabled(modules: &Modules) -> Vec<Page> {
        Self::ALL
            .into_iter()
            .filter(|page| page.is_enabled(modules))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn all_pages_enabled_by_default() {
        let pages = Page::enabled(&Modules::default());

        assert_eq!(pages.len(), 9);
        assert_eq!(pages[0].file_name(), "index.html");
    }

    #[test]
    fn blog_module_controls_blog_pages() {
        let modules = Modules {
            blog: false,
            ..Default::default()
        };

        let names: Vec<&str> = Page::enabled(&modules)
            .iter()
            .map(|p| p.file_name())
            .collect();

        assert_eq!(
            names,
            vec![
                "index.html",
                "about.html",
                "contact.html",
                "privacy.html",
                "terms.html",
                "booking.html",
                "product.html",
            ]
        );
    }

    #[test]
    fn booking_page_is_always_built() {
        let modules = Modules {
            booking: false,
            ..Default::default()
        };

        assert!(Page::Booking.is_enabled(&modules));
    }

    #[test]
    fn detail_pages_stay_out_of_sitemap() {
        assert!(!Page::Product.in_sitemap());
        assert!(!Page::Post.in_sitemap());
        assert!(Page::Privacy.in_sitemap());
    }
}
